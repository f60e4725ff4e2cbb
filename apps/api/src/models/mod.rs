pub mod feedback;
#[cfg(test)]
pub mod fixtures;
pub mod presets;
pub mod resume;

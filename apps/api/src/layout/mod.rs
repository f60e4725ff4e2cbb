// Renderer-agnostic layout: style resolution, section filtering and ordering,
// font metrics and the page cursor. Every renderer builds on these, never on raw ResumeData.

pub mod cursor;
pub mod font_metrics;
pub mod sections;
pub mod style;

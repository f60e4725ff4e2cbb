use std::sync::Arc;

use crate::ai::SharedAnalyst;
use crate::config::Config;
use crate::render::backend::BackendLoader;
use crate::render::docx::DocxPackager;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no resume data: every request carries its own snapshot.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// AI collaborator. `UnconfiguredAnalyst` when `AI_ENDPOINT` is unset.
    pub analyst: SharedAnalyst,
    /// Lazily acquired DOCX packaging backend.
    pub docx_loader: Arc<BackendLoader<dyn DocxPackager>>,
}

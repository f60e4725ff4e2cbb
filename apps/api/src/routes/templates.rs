use axum::Json;
use serde::Serialize;

use crate::models::presets::{template_resume, theme_presets, ThemePreset};
use crate::models::resume::ResumeData;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatesResponse {
    pub presets: Vec<ThemePreset>,
    pub default_resume: ResumeData,
}

/// GET /api/v1/templates
///
/// Theme presets plus the template resume a new session starts from.
pub async fn handle_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        presets: theme_presets(),
        default_resume: template_resume(),
    })
}

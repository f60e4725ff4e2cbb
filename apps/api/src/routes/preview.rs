//! Axum route handlers for the live preview.
//!
//! A snapshot being edited may not have a name yet, so only the section order is
//! validated here.

use axum::{response::Html, Json};

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::render::preview::PreviewDocument;
use crate::render::RenderInput;

async fn build_preview(data: ResumeData) -> Result<PreviewDocument, AppError> {
    data.validate_section_order()?;
    tokio::task::spawn_blocking(move || PreviewDocument::build(&RenderInput::from_snapshot(&data)))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in preview: {e}")))
}

/// POST /api/v1/preview
pub async fn handle_preview(
    Json(data): Json<ResumeData>,
) -> Result<Json<PreviewDocument>, AppError> {
    Ok(Json(build_preview(data).await?))
}

/// POST /api/v1/preview/html
pub async fn handle_preview_html(
    Json(data): Json<ResumeData>,
) -> Result<Html<String>, AppError> {
    Ok(Html(build_preview(data).await?.to_html()))
}

//! Axum route handlers for document export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::render::docx::DocxRenderer;
use crate::render::latex::LatexRenderer;
use crate::render::pdf::PdfRenderer;
use crate::render::{export_filename, ExportFormat, RenderInput, ResumeRenderer};
use crate::state::AppState;

/// POST /api/v1/render/pdf
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(data): Json<ResumeData>,
) -> Result<Response, AppError> {
    export(&state, data, ExportFormat::Pdf).await
}

/// POST /api/v1/render/docx
///
/// Acquires the packaging backend first; an unavailable backend is a 503 with a hint.
pub async fn handle_render_docx(
    State(state): State<AppState>,
    Json(data): Json<ResumeData>,
) -> Result<Response, AppError> {
    export(&state, data, ExportFormat::Docx).await
}

/// POST /api/v1/render/latex
pub async fn handle_render_latex(
    State(state): State<AppState>,
    Json(data): Json<ResumeData>,
) -> Result<Response, AppError> {
    export(&state, data, ExportFormat::Latex).await
}

async fn renderer_for(
    state: &AppState,
    format: ExportFormat,
) -> Result<Box<dyn ResumeRenderer>, AppError> {
    Ok(match format {
        ExportFormat::Pdf => Box::new(PdfRenderer),
        ExportFormat::Latex => Box::new(LatexRenderer),
        ExportFormat::Docx => {
            let loader = &state.docx_loader;
            let packager = loader.acquire().await.into_result(loader.what())?;
            Box::new(DocxRenderer::new(packager))
        }
    })
}

async fn export(state: &AppState, data: ResumeData, format: ExportFormat) -> Result<Response, AppError> {
    data.validate()?;
    let renderer = renderer_for(state, format).await?;

    let export_id = Uuid::new_v4();
    let filename = export_filename(&data.personal_details.name, format);

    // CPU-bound; the snapshot is moved in and nothing is shared with other requests.
    let document = tokio::task::spawn_blocking(move || {
        let input = RenderInput::from_snapshot(&data);
        renderer.render(&input)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {format} export: {e}")))??;

    info!(
        %export_id,
        format = %format,
        bytes = document.bytes.len(),
        pages = ?document.pages,
        "Export complete"
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.media_type().to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        Bytes::from(document.bytes),
    )
        .into_response())
}

/// `attachment; filename="..."`, plus an RFC 5987 `filename*` when the name is not ASCII.
pub fn content_disposition(filename: &str) -> String {
    if filename.is_ascii() {
        return format!("attachment; filename=\"{filename}\"");
    }
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let mut encoded = String::new();
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

//! Axum route handlers for the AI collaborator. Failures never surface as errors:
//! the response carries the placeholder instead.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::ai::{feedback_or_placeholder, summary_or_placeholder};
use crate::models::feedback::AiFeedback;
use crate::models::resume::ResumeData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub resume_data: ResumeData,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_data: ResumeData,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// POST /api/v1/ai/summary
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Json<SummaryResponse> {
    let summary = summary_or_placeholder(state.analyst.as_ref(), &request.resume_data).await;
    Json(SummaryResponse { summary })
}

/// POST /api/v1/ai/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AiFeedback> {
    Json(
        feedback_or_placeholder(
            state.analyst.as_ref(),
            &request.resume_data,
            request.job_description.as_deref(),
        )
        .await,
    )
}

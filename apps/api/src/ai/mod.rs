//! AI collaborator: the single point of entry for summary generation and ATS analysis.
//!
//! No renderer or route talks to the collaborator directly. Routes call
//! `summary_or_placeholder` / `feedback_or_placeholder`, which never fail: any error
//! is logged and replaced by a fixed placeholder.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::feedback::{AiFeedback, SUMMARY_FAILED_TEXT};
use crate::models::resume::ResumeData;

const MAX_ATTEMPTS: u32 = 3;
const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI collaborator is not configured (AI_ENDPOINT is unset)")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("collaborator error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("collaborator returned an empty summary")]
    EmptySummary,

    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[async_trait]
pub trait ResumeAnalyst: Send + Sync {
    async fn generate_summary(&self, data: &ResumeData) -> Result<String, AiError>;

    async fn analyze(
        &self,
        data: &ResumeData,
        job_description: Option<&str>,
    ) -> Result<AiFeedback, AiError>;
}

pub type SharedAnalyst = Arc<dyn ResumeAnalyst>;

// ────────────────────────────────────────────────────────────────────────────
// Boundary
// ────────────────────────────────────────────────────────────────────────────

pub async fn summary_or_placeholder(analyst: &dyn ResumeAnalyst, data: &ResumeData) -> String {
    match analyst.generate_summary(data).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "Summary generation failed, returning placeholder");
            SUMMARY_FAILED_TEXT.to_string()
        }
    }
}

pub async fn feedback_or_placeholder(
    analyst: &dyn ResumeAnalyst,
    data: &ResumeData,
    job_description: Option<&str>,
) -> AiFeedback {
    let job_description = job_description.map(str::trim).filter(|jd| !jd.is_empty());
    match analyst.analyze(data, job_description).await {
        Ok(feedback) => feedback,
        Err(e) => {
            warn!(error = %e, "Resume analysis failed, returning placeholder");
            AiFeedback::placeholder()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Implementations
// ────────────────────────────────────────────────────────────────────────────

/// Used when no endpoint is configured. Every call fails, so callers get placeholders.
pub struct UnconfiguredAnalyst;

#[async_trait]
impl ResumeAnalyst for UnconfiguredAnalyst {
    async fn generate_summary(&self, _data: &ResumeData) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn analyze(&self, _data: &ResumeData, _jd: Option<&str>) -> Result<AiFeedback, AiError> {
        Err(AiError::NotConfigured)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollaboratorRequest<'a> {
    action: &'a str,
    resume_data: &'a ResumeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_description: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

/// Feedback as the collaborator sends it; the score may be fractional or out of range.
#[derive(Debug, Deserialize)]
struct RawFeedback {
    score: f64,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    summary: String,
}

impl From<RawFeedback> for AiFeedback {
    fn from(raw: RawFeedback) -> Self {
        let score = if raw.score.is_finite() {
            raw.score.round().clamp(0.0, MAX_SCORE) as u8
        } else {
            0
        };
        AiFeedback {
            score,
            suggestions: raw.suggestions,
            summary: raw.summary,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CollaboratorError {
    error: String,
}

/// POSTs `{action, resumeData, jobDescription}` to the configured endpoint.
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct HttpAnalyst {
    client: Client,
    endpoint: String,
    base_backoff: Duration,
}

impl HttpAnalyst {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            base_backoff: Duration::from_secs(1),
        })
    }

    pub fn with_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// Raw response body of one action.
    async fn call(&self, request: &CollaboratorRequest<'_>) -> Result<String, AiError> {
        let mut last_error: Option<AiError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // 1s, 2s, 4s with the default base
                let delay = self.base_backoff * (1 << (attempt - 1));
                warn!(
                    action = request.action,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Collaborator call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(request).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AiError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!(action = request.action, %status, "Collaborator returned a retryable status");
                last_error = Some(AiError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            let body = response.text().await?;
            if !status.is_success() {
                let message = serde_json::from_str::<CollaboratorError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(AiError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!(action = request.action, bytes = body.len(), "Collaborator call succeeded");
            return Ok(body);
        }

        Err(last_error.unwrap_or(AiError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }
}

#[async_trait]
impl ResumeAnalyst for HttpAnalyst {
    async fn generate_summary(&self, data: &ResumeData) -> Result<String, AiError> {
        let body = self
            .call(&CollaboratorRequest {
                action: "generateSummary",
                resume_data: data,
                job_description: None,
            })
            .await?;
        let response: SummaryResponse = serde_json::from_str(strip_json_fences(&body))?;
        let summary = response.summary.trim();
        if summary.is_empty() {
            return Err(AiError::EmptySummary);
        }
        Ok(summary.to_string())
    }

    async fn analyze(
        &self,
        data: &ResumeData,
        job_description: Option<&str>,
    ) -> Result<AiFeedback, AiError> {
        let body = self
            .call(&CollaboratorRequest {
                action: "analyzeResume",
                resume_data: data,
                job_description,
            })
            .await?;
        let raw: RawFeedback = serde_json::from_str(strip_json_fences(&body))?;
        Ok(raw.into())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from collaborator output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::models::feedback::{ANALYSIS_FAILED_SUGGESTION, ANALYSIS_FAILED_SUMMARY};
    use crate::models::presets::template_resume;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        assert_eq!(strip_json_fences(" {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_score_is_clamped_and_rounded() {
        let feedback = |score: f64| {
            AiFeedback::from(RawFeedback {
                score,
                suggestions: vec![],
                summary: String::new(),
            })
            .score
        };
        assert_eq!(feedback(87.6), 88);
        assert_eq!(feedback(140.0), 100);
        assert_eq!(feedback(-3.0), 0);
        assert_eq!(feedback(f64::NAN), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_analyst_yields_placeholders() {
        let data = template_resume();
        assert_eq!(
            summary_or_placeholder(&UnconfiguredAnalyst, &data).await,
            SUMMARY_FAILED_TEXT
        );
        let feedback = feedback_or_placeholder(&UnconfiguredAnalyst, &data, Some("Rust")).await;
        assert_eq!(feedback.score, 0);
        assert_eq!(feedback.suggestions, vec![ANALYSIS_FAILED_SUGGESTION.to_string()]);
        assert_eq!(feedback.summary, ANALYSIS_FAILED_SUMMARY);
    }

    // ── In-process collaborator ─────────────────────────────────────────────

    async fn spawn_collaborator(failures: usize) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/",
                post(
                    move |State(calls): State<Arc<AtomicUsize>>, Json(body): Json<Value>| async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < failures {
                            return (StatusCode::SERVICE_UNAVAILABLE, String::from("busy"));
                        }
                        match body["action"].as_str() {
                            Some("generateSummary") => (
                                StatusCode::OK,
                                json!({"summary": "  Seasoned engineer.  "}).to_string(),
                            ),
                            Some("analyzeResume") => {
                                let jd = body["jobDescription"].as_str().unwrap_or("none");
                                (
                                    StatusCode::OK,
                                    format!(
                                        "```json\n{}\n```",
                                        json!({"score": 101.2, "suggestions": [jd], "summary": "ok"})
                                    ),
                                )
                            }
                            _ => (
                                StatusCode::BAD_REQUEST,
                                json!({"error": "Invalid action specified."}).to_string(),
                            ),
                        }
                    },
                ),
            )
            .with_state(calls.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), calls)
    }

    fn analyst(endpoint: String) -> HttpAnalyst {
        HttpAnalyst::new(endpoint, Duration::from_secs(5))
            .unwrap()
            .with_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_http_analyst_retries_server_errors() {
        let (endpoint, calls) = spawn_collaborator(2).await;
        let summary = analyst(endpoint).generate_summary(&template_resume()).await.unwrap();
        assert_eq!(summary, "Seasoned engineer.");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_http_analyst_gives_up_after_three_attempts() {
        let (endpoint, calls) = spawn_collaborator(10).await;
        let analyst = analyst(endpoint);
        let err = analyst.generate_summary(&template_resume()).await.unwrap_err();
        assert!(matches!(err, AiError::Api { status: 503, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            summary_or_placeholder(&analyst, &template_resume()).await,
            SUMMARY_FAILED_TEXT
        );
    }

    #[tokio::test]
    async fn test_http_analyst_parses_fenced_feedback() {
        let (endpoint, _) = spawn_collaborator(0).await;
        let feedback = analyst(endpoint)
            .analyze(&template_resume(), Some("Rust developer"))
            .await
            .unwrap();
        assert_eq!(feedback.score, 100);
        assert_eq!(feedback.suggestions, vec!["Rust developer".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_job_description_is_omitted() {
        let (endpoint, _) = spawn_collaborator(0).await;
        let feedback =
            feedback_or_placeholder(&analyst(endpoint), &template_resume(), Some("   ")).await;
        assert_eq!(feedback.suggestions, vec!["none".to_string()]);
    }
}

pub mod ai;
pub mod health;
pub mod preview;
pub mod render;
pub mod templates;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(templates::handle_templates))
        // Export
        .route("/api/v1/render/pdf", post(render::handle_render_pdf))
        .route("/api/v1/render/docx", post(render::handle_render_docx))
        .route("/api/v1/render/latex", post(render::handle_render_latex))
        // Live preview
        .route("/api/v1/preview", post(preview::handle_preview))
        .route("/api/v1/preview/html", post(preview::handle_preview_html))
        // AI collaborator
        .route("/api/v1/ai/summary", post(ai::handle_generate_summary))
        .route("/api/v1/ai/analyze", post(ai::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::ai::{AiError, ResumeAnalyst, UnconfiguredAnalyst};
    use crate::config::Config;
    use crate::models::feedback::{AiFeedback, SUMMARY_FAILED_TEXT};
    use crate::models::presets::template_resume;
    use crate::models::resume::ResumeData;
    use crate::render::backend::{
        docx_loader, AcquireError, AcquirePolicy, BackendLoader, BackendSource,
    };
    use crate::render::docx::DocxPackager;

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    fn state() -> AppState {
        AppState {
            config: config(),
            analyst: Arc::new(UnconfiguredAnalyst),
            docx_loader: Arc::new(docx_loader(AcquirePolicy::new(Duration::from_millis(50), 1))),
        }
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes.to_vec())
    }

    fn snapshot() -> Value {
        serde_json::to_value(template_resume()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_templates_round_trip_as_snapshots() {
        let response = build_router(state())
            .oneshot(Request::builder().uri("/api/v1/templates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: Value =
            serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
        assert_eq!(body["presets"].as_array().unwrap().len(), 3);
        let resume: ResumeData = serde_json::from_value(body["defaultResume"].clone()).unwrap();
        assert_eq!(resume, template_resume());
    }

    #[tokio::test]
    async fn test_pdf_export_headers_and_body() {
        let (status, headers, body) = post_json(build_router(state()), "/api/v1/render/pdf", snapshot()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"John_Doe_Resume.pdf\""
        );
        assert!(body.starts_with(b"%PDF-1.7"));
    }

    #[tokio::test]
    async fn test_docx_and_latex_exports() {
        let (status, headers, body) = post_json(build_router(state()), "/api/v1/render/docx", snapshot()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().contains("wordprocessingml"));
        assert!(body.starts_with(b"PK"));

        let (status, headers, body) = post_json(build_router(state()), "/api/v1/render/latex", snapshot()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"John_Doe_Resume.tex\""
        );
        assert!(String::from_utf8(body).unwrap().contains(r"\section{Experience}"));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_for_export() {
        let mut data = snapshot();
        data["personalDetails"]["name"] = json!("   ");
        let (status, _, body) = post_json(build_router(state()), "/api/v1/render/pdf", data).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_duplicate_section_is_rejected_everywhere() {
        let mut data = snapshot();
        data["sectionOrder"] = json!(["skills", "skills"]);
        for uri in ["/api/v1/render/latex", "/api/v1/preview"] {
            let (status, _, _) = post_json(build_router(state()), uri, data.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_preview_tolerates_missing_name() {
        let mut data = snapshot();
        data["personalDetails"]["name"] = json!("");
        let (status, _, body) = post_json(build_router(state()), "/api/v1/preview", data).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["sections"][0]["title"]["text"], "Summary");

        let (status, headers, body) =
            post_json(build_router(state()), "/api/v1/preview/html", snapshot()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(String::from_utf8(body).unwrap().contains("John Doe"));
    }

    #[tokio::test]
    async fn test_body_limit_is_enforced() {
        let mut state = state();
        state.config.max_body_bytes = 64;
        let (status, _, _) = post_json(build_router(state), "/api/v1/render/pdf", snapshot()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    // ── DOCX backend unavailable ────────────────────────────────────────────

    struct Blocked;

    #[async_trait]
    impl BackendSource<dyn DocxPackager> for Blocked {
        fn name(&self) -> &str {
            "cdn"
        }

        async fn load(&self) -> Result<Arc<dyn DocxPackager>, AcquireError> {
            Err(AcquireError::LoadFailed {
                name: "cdn".into(),
                reason: "blocked by client".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_unavailable_docx_backend_is_503_with_hint() {
        let mut state = state();
        let sources: Vec<Arc<dyn BackendSource<dyn DocxPackager>>> = vec![Arc::new(Blocked)];
        state.docx_loader = Arc::new(BackendLoader::new(
            "DOCX",
            sources,
            AcquirePolicy::new(Duration::from_millis(50), 1),
        ));
        let (status, headers, body) = post_json(build_router(state), "/api/v1/render/docx", snapshot()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(headers.get(header::CONTENT_DISPOSITION).is_none());
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "RENDERER_UNAVAILABLE");
        assert!(body["error"]["message"].as_str().unwrap().contains("ad-blocker"));
    }

    // ── AI ──────────────────────────────────────────────────────────────────

    struct Canned;

    #[async_trait]
    impl ResumeAnalyst for Canned {
        async fn generate_summary(&self, data: &ResumeData) -> Result<String, AiError> {
            Ok(format!("Summary for {}", data.personal_details.name))
        }

        async fn analyze(&self, _data: &ResumeData, jd: Option<&str>) -> Result<AiFeedback, AiError> {
            Ok(AiFeedback {
                score: 72,
                suggestions: vec![jd.unwrap_or("general").to_string()],
                summary: "Solid".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_ai_routes_degrade_to_placeholders() {
        let (status, _, body) = post_json(
            build_router(state()),
            "/api/v1/ai/summary",
            json!({ "resumeData": snapshot() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["summary"], SUMMARY_FAILED_TEXT);

        let (_, _, body) = post_json(
            build_router(state()),
            "/api/v1/ai/analyze",
            json!({ "resumeData": snapshot() }),
        )
        .await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["score"], 0);
        assert_eq!(body["summary"], "Analysis could not be completed.");
    }

    #[tokio::test]
    async fn test_ai_routes_pass_through_collaborator() {
        let mut state = state();
        state.analyst = Arc::new(Canned);

        let (_, _, body) = post_json(
            build_router(state.clone()),
            "/api/v1/ai/summary",
            json!({ "resumeData": snapshot() }),
        )
        .await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["summary"], "Summary for John Doe");

        let (_, _, body) = post_json(
            build_router(state),
            "/api/v1/ai/analyze",
            json!({ "resumeData": snapshot(), "jobDescription": "Backend engineer" }),
        )
        .await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["score"], 72);
        assert_eq!(body["suggestions"][0], "Backend engineer");
    }
}

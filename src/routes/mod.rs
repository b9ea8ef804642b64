//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/simplify` - Paper upload and simplification
//! - `/api/download/{filename}` - Rendered output download
//! - `/api/original/{filename}` - Archived original papers
//! - `/health` - Liveness check
//! - `/` and `/static` - Upload page

pub mod files;
pub mod health;
pub mod simplify;
pub mod static_files;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;
use crate::models::AppState;
use tracing::info;

/// Create the main application router
///
/// The upload body limit applies to every route; only `/api/simplify`
/// reads a body.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let body_limit = state.config.server.max_upload_bytes;
    let static_dir = state.config.storage.static_dir.clone();

    let api_router = Router::new()
        .merge(simplify::router(state.clone()))
        .merge(files::router(state))
        .merge(health::router());

    Router::new()
        .merge(api_router)
        .merge(static_files::router(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DeployConfig, LLMConfig, RenderConfig, ServerConfig, StorageConfig};
    use crate::llm::provider::LLMAdapter;
    use crate::models::{ErrorResponse, HealthResponse, SimplifyResponse};
    use crate::types::{AppError, AppResult, LLMProvider, LLMRequest, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "simplifierboundary";
    const MARKDOWN: &str = "## Community Summary\nPlants **breathe** too.\n\n### Blog Post\nA longer story.";

    struct StubLLM(Result<&'static str, &'static str>);

    #[async_trait]
    impl LLMAdapter for StubLLM {
        async fn create_chat_completion(&self, _request: &LLMRequest) -> AppResult<LLMResponse> {
            match self.0 {
                Ok(content) => Ok(LLMResponse {
                    content: content.to_string(),
                    finish_reason: "stop".to_string(),
                    usage: TokenUsage::default(),
                }),
                Err(msg) => Err(AppError::Generation(msg.to_string())),
            }
        }
    }

    fn test_config(root: &TempDir, max_upload_bytes: usize, verbose_errors: bool) -> Config {
        Config {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                max_upload_bytes,
                verbose_errors,
            },
            llm: LLMConfig {
                provider: LLMProvider::OpenAI,
                api_key: "test".to_string(),
                api_base: None,
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 8000,
            },
            storage: StorageConfig {
                upload_dir: root.path().join("uploads"),
                output_dir: root.path().join("outputs"),
                originals_dir: root.path().join("originals"),
                originals_base_url: "https://example.org/originals".to_string(),
                static_dir: root.path().join("static"),
            },
            render: RenderConfig { pdf_engine: None },
            deploy: DeployConfig {
                scp_target: "user@server:/var/www/html/".to_string(),
            },
        }
    }

    async fn app_with(root: &TempDir, llm: StubLLM, max_upload_bytes: usize, verbose: bool) -> Router {
        let state = crate::build_state_with_llm(test_config(root, max_upload_bytes, verbose), Arc::new(llm));
        state.pipeline.store().ensure_dirs().await.unwrap();
        create_router(state)
    }

    async fn app(root: &TempDir) -> Router {
        app_with(root, StubLLM(Ok(MARKDOWN)), 1024 * 1024, true).await
    }

    fn multipart_body(file: Option<(&str, &[u8])>, format: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(format) = format {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"format\"\r\n\r\n{format}\r\n")
                    .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn simplify_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/simplify")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn error_message(response: axum::response::Response) -> String {
        let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        body.error
    }

    fn count_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    fn paper_text() -> Vec<u8> {
        format!("Abstract. {}", "Photosynthesis converts light into chemical energy. ".repeat(10)).into_bytes()
    }

    #[tokio::test]
    async fn test_simplify_html_round_trip() {
        let root = TempDir::new().unwrap();
        let app = app(&root).await;

        let text = paper_text();
        let response = app
            .clone()
            .oneshot(simplify_request(multipart_body(Some(("My Paper.txt", &text)), Some("html"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let result: SimplifyResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(result.success);
        assert!(result.filename.starts_with("simplified_"));
        assert!(result.filename.ends_with("_My_Paper.html"));
        assert_eq!(result.download_url, format!("/api/download/{}", result.filename));

        let token = result
            .filename
            .trim_start_matches("simplified_")
            .trim_end_matches("_My_Paper.html");
        let stored = format!("{}_My_Paper.txt", token);
        assert_eq!(result.original_paper_url, format!("https://example.org/originals/{}", stored));
        assert!(root.path().join("originals").join(&stored).exists());

        let response = app.clone().oneshot(get(&result.download_url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment"));
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("<h2>Community Summary</h2>"));
        assert!(html.contains("<h3>Blog Post</h3>"));
        assert!(html.contains("<strong>breathe</strong>"));
        assert!(html.contains(&result.original_paper_url));

        let response = app.oneshot(get(&format!("/api/original/{}", stored))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        assert_eq!(body_bytes(response).await, text);
    }

    #[tokio::test]
    async fn test_simplify_pdf_output() {
        let root = TempDir::new().unwrap();
        let app = app(&root).await;

        let response = app
            .clone()
            .oneshot(simplify_request(multipart_body(Some(("paper.txt", &paper_text())), Some("pdf"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result: SimplifyResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(result.filename.ends_with("_paper.pdf"));

        let response = app.oneshot(get(&result.download_url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_missing_file_writes_nothing() {
        let root = TempDir::new().unwrap();
        let app = app(&root).await;

        let response = app
            .oneshot(simplify_request(multipart_body(None, Some("html"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(response).await, "No file uploaded");
        assert_eq!(count_files(&root.path().join("uploads")), 0);
        assert_eq!(count_files(&root.path().join("originals")), 0);
    }

    #[tokio::test]
    async fn test_non_multipart_request_is_rejected() {
        let root = TempDir::new().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/simplify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app(&root).await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(response).await, "No file uploaded");
    }

    #[tokio::test]
    async fn test_disallowed_extension_writes_nothing() {
        let root = TempDir::new().unwrap();
        let app = app(&root).await;

        let response = app
            .oneshot(simplify_request(multipart_body(Some(("paper.docx", &paper_text())), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(response).await,
            "File type not allowed. Please upload PDF or TXT files."
        );
        assert_eq!(count_files(&root.path().join("uploads")), 0);
        assert_eq!(count_files(&root.path().join("originals")), 0);
    }

    #[tokio::test]
    async fn test_short_text_keeps_only_archive() {
        let root = TempDir::new().unwrap();
        let app = app(&root).await;

        let response = app
            .oneshot(simplify_request(multipart_body(Some(("tiny.txt", b"Too short.")), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.starts_with("Could not extract sufficient text"));
        assert_eq!(count_files(&root.path().join("uploads")), 0);
        assert_eq!(count_files(&root.path().join("originals")), 1);
        assert_eq!(count_files(&root.path().join("outputs")), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let root = TempDir::new().unwrap();
        let app = app_with(&root, StubLLM(Ok(MARKDOWN)), 1024, true).await;

        let response = app
            .oneshot(simplify_request(multipart_body(Some(("big.txt", &[b'a'; 4096])), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_files(&root.path().join("uploads")), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_redaction() {
        let root = TempDir::new().unwrap();
        let quiet = app_with(&root, StubLLM(Err("upstream exploded")), 1024 * 1024, false).await;
        let response = quiet
            .oneshot(simplify_request(multipart_body(Some(("paper.txt", &paper_text())), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(response).await, "An error occurred while processing your file.");

        let root = TempDir::new().unwrap();
        let verbose = app_with(&root, StubLLM(Err("upstream exploded")), 1024 * 1024, true).await;
        let response = verbose
            .oneshot(simplify_request(multipart_body(Some(("paper.txt", &paper_text())), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = error_message(response).await;
        assert!(message.starts_with("An error occurred: "));
        assert!(message.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_unknown_and_traversal_downloads_are_not_found() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("secret.txt"), "do not serve").unwrap();
        let app = app(&root).await;

        let response = app.clone().oneshot(get("/api/download/missing.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(response).await, "File not found");

        let response = app.clone().oneshot(get("/api/download/..%2Fsecret.txt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/api/original/..%2Fsecret.txt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let root = TempDir::new().unwrap();
        let response = app(&root).await.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body.status, "healthy");
    }

    #[tokio::test]
    async fn test_landing_page() {
        let root = TempDir::new().unwrap();
        let app = app(&root).await;

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("Science Simplifier"));

        std::fs::create_dir_all(root.path().join("static/js")).unwrap();
        std::fs::write(root.path().join("static/index.html"), "<h1>custom page</h1>").unwrap();
        std::fs::write(root.path().join("static/js/main.js"), "console.log('hi');").unwrap();

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(body_bytes(response).await, b"<h1>custom page</h1>");

        let response = app.oneshot(get("/static/js/main.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

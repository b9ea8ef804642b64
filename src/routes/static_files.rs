//! Static File Serving
//!
//! Serves the upload page from `STATIC_DIR/index.html` and its assets
//! under `/static`.

use axum::{
    Router,
    routing::get,
    extract::State,
    response::{IntoResponse, Response},
    http::{StatusCode, header},
};
use tower_http::services::ServeDir;
use std::path::PathBuf;
use tracing::warn;

/// Create router for the landing page and its assets
pub fn router(static_dir: PathBuf) -> Router {
    let serve_dir = ServeDir::new(&static_dir);

    Router::new()
        .route("/", get(serve_index))
        .nest_service("/static", serve_dir)
        .with_state(static_dir)
}

/// Serve the index page
async fn serve_index(State(static_dir): State<PathBuf>) -> Response {
    let path = static_dir.join("index.html");

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Landing page not found, serving fallback");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                FALLBACK_HTML,
            )
                .into_response()
        }
    }
}

const FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Science Simplifier</title>
    <style>
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 700px;
            margin: 0 auto;
            padding: 40px 20px;
            color: #333;
        }
        h1 { color: #2c3e50; }
        code { background: #ecf0f1; padding: 2px 6px; border-radius: 4px; }
        pre { background: #ecf0f1; padding: 15px; border-radius: 6px; overflow-x: auto; }
    </style>
</head>
<body>
    <h1>Science Simplifier</h1>
    <p>The upload page is not installed. Set <code>STATIC_DIR</code> to the directory holding <code>index.html</code>, or call the API directly:</p>
    <pre>curl -F "file=@paper.pdf" -F "format=html" http://localhost:5000/api/simplify</pre>
    <ul>
        <li><code>POST /api/simplify</code> - upload a PDF or TXT paper</li>
        <li><code>GET /api/download/{filename}</code> - fetch a rendered result</li>
        <li><code>GET /api/original/{filename}</code> - fetch an archived original</li>
        <li><code>GET /health</code> - liveness check</li>
    </ul>
</body>
</html>"#;

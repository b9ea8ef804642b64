use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::info;

use crate::agents::DocumentKind;
use crate::models::AppState;
use crate::render::OutputFormat;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/download/{filename}", get(download))
        .route("/api/original/{filename}", get(serve_original))
        .with_state(state)
}

/// GET /api/download/{filename} - rendered output as an attachment
async fn download(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    match state.pipeline.store().read_output(&filename).await {
        Ok(data) => {
            info!(%filename, size = data.len(), "Serving rendered output");
            let mime = OutputFormat::from_filename(&filename).mime_type();
            (
                [
                    (header::CONTENT_TYPE, mime.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                data,
            )
                .into_response()
        }
        Err(e) => e.into_response_with(state.config.server.verbose_errors),
    }
}

/// GET /api/original/{filename} - archived original upload
async fn serve_original(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    match state.pipeline.store().read_original(&filename).await {
        Ok(data) => {
            let mime = DocumentKind::for_serving(&filename).mime_type();
            ([(header::CONTENT_TYPE, mime.to_string())], data).into_response()
        }
        Err(e) => e.into_response_with(state.config.server.verbose_errors),
    }
}

use axum::{Router, routing::get, Json, response::Json as ResponseJson};
use crate::models::HealthResponse;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_check))
}

// Liveness only; no dependency checks
async fn health_check() -> ResponseJson<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

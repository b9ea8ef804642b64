use std::sync::Arc;

use crate::agents::SimplifyPipeline;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<SimplifyPipeline>,
}

// API Request/Response types

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimplifyResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
    pub original_paper_url: String,
    pub scp_commands: ScpCommands,
}

/// Copy-paste deployment hint; the server never runs it
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScpCommands {
    pub simplified: String,
    pub note: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

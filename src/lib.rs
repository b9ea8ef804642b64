// Science Simplifier - turns scientific papers into plain-language content for public audiences

pub mod config;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod render;    // Markdown-to-HTML and HTML-to-PDF output
pub mod storage;   // Upload, archive, and output directories
pub mod routes;
pub mod utils;

use std::sync::Arc;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

use agents::SimplifyPipeline;
use llm::provider::{LLMAdapter, LLM};

/// Build shared state from configuration, talking to the configured LLM provider
pub fn build_state(config: Config) -> AppState {
    let llm: Arc<dyn LLMAdapter> = Arc::new(LLM::new(&config.llm));
    build_state_with_llm(config, llm)
}

/// Build shared state around a caller-supplied generation backend
pub fn build_state_with_llm(config: Config, llm: Arc<dyn LLMAdapter>) -> AppState {
    let pipeline = Arc::new(SimplifyPipeline::from_config(&config, llm));
    AppState { config, pipeline }
}

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}

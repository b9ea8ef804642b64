use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use science_simplifier::{build_state, config::Config, create_router, utils::init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    if config.llm.api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; simplify requests will fail at the generation step");
    }

    // Create shared state
    let state = build_state(config.clone());

    // Ensure upload, output, and original papers directories exist
    let store = state.pipeline.store();
    store
        .ensure_dirs()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create storage directories: {}", e))?;
    info!(
        uploads = %store.upload_dir().display(),
        outputs = %store.output_dir().display(),
        originals = %store.originals_dir().display(),
        "Storage directories ready"
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

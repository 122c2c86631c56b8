//! Presale Stage - presentation state engine for a token-sale landing site
//! 
//! This is the main entry point for the presale-stage rendering host.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use presale_stage::{
    api::{create_router, HostState},
    config::Config,
    runtime::{SharedViewport, TokioScheduler},
    state::SiteState,
    tasks::render_task,
    utils::shutdown_signal,
};

// All engine callbacks run on one cooperative thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("presale_stage={},tower_http=info", config.log_level()))
        .init();

    info!("Starting presale-stage v{}", env!("CARGO_PKG_VERSION"));
    let content = config.load_content()?;
    info!("Configuration: host={}, port={}, deadline={}",
          config.host, config.port, content.deadline);

    // Create the site state with the tokio scheduler and a host-driven viewport
    let viewport = SharedViewport::new();
    let site = Arc::new(SiteState::new(
        content,
        Arc::new(TokioScheduler::current()),
        Arc::new(viewport.clone()),
    ));

    // Start the render loop
    let render_state = Arc::clone(&site);
    tokio::spawn(async move {
        render_task(render_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(HostState { site, viewport });

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /view                          - Current view snapshot");
    info!("  POST /section/:id                   - Select a section");
    info!("  POST /viewport/:container           - Report visible ratio {{\"ratio\": 0.5}}");
    info!("  POST /announcements/filter/:filter  - Filter announcements");
    info!("  POST /announcements/:index/toggle   - Expand or collapse a card");
    info!("  GET  /health                        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

use portfolio_site::{AppState, Config, router, routes::RefreshOutcome};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let port = config.port;
    let state = AppState::from_config(config).await?;

    // The root route is served whether or not this succeeds.
    match state.routes.refresh(&state.content).await {
        RefreshOutcome::Applied { routes } => info!(routes, "routes loaded"),
        RefreshOutcome::Failed(err) => warn!("starting with root route only: {err}"),
        RefreshOutcome::Stale => {}
    }

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

use ceu_dashboard::{ApiClient, AppState, Config, router};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    info!(api_base = %config.api_base, "using monitoring backend");

    let state = AppState::new(ApiClient::new(config.api_base.clone()), config.refresh);
    let loops = state.spawn_refresh_loops();
    let app = router(state);

    let addr = config.listen_addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    for handle in loops {
        handle.abort();
    }
    if let Err(err) = served {
        error!("server error: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

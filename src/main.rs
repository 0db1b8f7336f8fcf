// ==========================================
// bp-api - catalogue API server
// ==========================================
// Serves the imported Bosch price list over HTTP with token
// authentication. Configuration comes from the environment, see
// config::settings for the variable names.
// ==========================================

use bosch_price::app::{build_router, AppState};
use bosch_price::config::settings::ApiSettings;
use bosch_price::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("Bosch price catalogue API");
    tracing::info!("version: {}", bosch_price::VERSION);
    tracing::info!("==================================================");

    let settings = ApiSettings::from_env()?;
    let bind_addr = settings.bind_addr.clone();
    let route_prefix = settings.route_prefix.clone();

    let state = AppState::new(&settings).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, prefix = %route_prefix, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");

    Ok(())
}

/// Resolve on ctrl-c or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install ctrl-c handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

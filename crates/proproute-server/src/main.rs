mod api;
mod middleware;

use std::sync::Arc;

use proproute_routing::RouteAssembler;
use proproute_sheets::{PropertyStore, SheetsClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(proproute_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = SheetsClient::new(
        &config.sheets,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let routing = RouteAssembler::from_config(&config)?;
    if !routing.has_webhook() {
        tracing::warn!(
            fallback = routing.fallback_enabled(),
            "PROPROUTE_ROUTE_WEBHOOK_URL not set; routes will not be computed"
        );
    }

    let state = AppState {
        store: Arc::new(PropertyStore::new(client)),
        routing: Arc::new(routing),
        config: Arc::clone(&config),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "proproute server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

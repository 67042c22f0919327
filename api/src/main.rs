use std::time::Duration;

use anyhow::Result;
use axum::{routing::get, Router};
use shared::Config;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use api::routes;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Starting SignalDesk API server...");

    let config = Config::from_env()?;
    let state = AppState::new(&config);

    // Prime the snapshot once before serving so the UI rarely sees a
    // 503 on cold start.
    state.refresh_user().await;
    state.refresh_positions().await;
    state.refresh_prices().await;

    {
        let state = state.clone();
        let every = Duration::from_secs(config.user_poll_secs);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            loop {
                tick.tick().await;
                state.refresh_user().await;
            }
        });
    }
    {
        let state = state.clone();
        let every = Duration::from_secs(config.positions_poll_secs);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            loop {
                tick.tick().await;
                state.refresh_positions().await;
            }
        });
    }
    {
        let state = state.clone();
        let every = Duration::from_secs(config.price_poll_secs);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            loop {
                tick.tick().await;
                state.refresh_prices().await;
            }
        });
    }

    let app = Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/entitlement", get(routes::entitlement))
        .route("/api/usage", get(routes::usage))
        .route("/api/pnl", get(routes::pnl))
        .route("/api/summary", get(routes::summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.api_bind_addr).await?;
    info!("API server listening on http://{}", config.api_bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

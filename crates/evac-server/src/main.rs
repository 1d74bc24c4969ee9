//! Evacuation advisory server - hazard classification and shelter routing

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evac_server::{api, config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evac_server=debug,evac_routing=debug,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting evacuation advisory server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        "Routing via {} ({}), timeout {}s",
        config.routing_url,
        config.routing_profile,
        config.routing_timeout_s
    );
    let state = Arc::new(AppState::new(config)?);

    let app = api::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! REST API routes.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{advisory, ws, zones};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/zones", get(zones::list_zones))
        .route("/v1/zones/:zone_id", get(zones::get_zone))
        .route(
            "/v1/advisory",
            post(advisory::post_advisory).get(advisory::get_advisory),
        )
        .route("/v1/stream", get(ws::ws_handler))
}

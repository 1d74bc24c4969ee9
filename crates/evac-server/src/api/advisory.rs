//! Advisory endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use evac_core::{AdvisoryState, GeoPoint};
use serde::Deserialize;
use serde_json::Value;

use crate::advisory::PublishedAdvisory;
use crate::api::error_response;
use crate::geolocation::{resolve_location, GeolocationError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdvisoryRequest {
    /// Missing when the client's geolocation provider failed
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Run the advisory pipeline for the reported location.
pub async fn post_advisory(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdvisoryRequest>,
) -> Result<Json<AdvisoryState>, (StatusCode, Json<Value>)> {
    let reported = req.location.ok_or(GeolocationError::Unavailable);
    let location = resolve_location(reported, state.default_location());

    state
        .orchestrator()
        .advise(location)
        .await
        .map(Json)
        .map_err(|err| error_response(StatusCode::BAD_REQUEST, err.to_string()))
}

/// Latest published advisory.
pub async fn get_advisory(State(state): State<Arc<AppState>>) -> Json<PublishedAdvisory> {
    Json(state.orchestrator().current().as_ref().clone())
}

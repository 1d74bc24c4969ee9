//! Hazard zone listing for display.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use evac_core::{GeoPoint, HazardZone, Severity, ZoneQuery};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error_response;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct ZoneListQuery {
    pub severity: Option<String>,
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ZoneView {
    #[serde(flatten)]
    pub zone: HazardZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// List zones, optionally filtered, nearest first when a location is given.
pub async fn list_zones(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ZoneListQuery>,
) -> Result<Json<Vec<ZoneView>>, (StatusCode, Json<Value>)> {
    let severity = params
        .severity
        .as_deref()
        .map(str::parse::<Severity>)
        .transpose()
        .map_err(|err| error_response(StatusCode::BAD_REQUEST, err))?;

    let location = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Some(
            GeoPoint::new(lat, lon)
                .map_err(|err| error_response(StatusCode::BAD_REQUEST, err.to_string()))?,
        ),
        (None, None) => None,
        _ => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "lat and lon must be provided together",
            ))
        }
    };

    let query = ZoneQuery {
        severity,
        text: params.q,
    };
    let registry = state.registry();

    let views = match location {
        Some(location) => registry
            .nearby(location, &query)
            .into_iter()
            .map(|entry| ZoneView {
                zone: entry.zone.clone(),
                distance_km: Some(entry.distance_km),
            })
            .collect(),
        None => registry
            .filter(&query)
            .map(|zone| ZoneView {
                zone: zone.clone(),
                distance_km: None,
            })
            .collect(),
    };

    Ok(Json(views))
}

/// Get a specific zone by ID.
pub async fn get_zone(
    State(state): State<Arc<AppState>>,
    Path(zone_id): Path<String>,
) -> Result<Json<HazardZone>, StatusCode> {
    state
        .registry()
        .get(&zone_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

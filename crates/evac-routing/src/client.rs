//! OSRM HTTP client and the provider seam used by the route advisor.

use std::future::Future;

use evac_core::{GeoPoint, RouteResult, RouteStep};
use reqwest::Client;
use serde::Deserialize;

use crate::error::RoutingError;

const METERS_PER_KM: f64 = 1000.0;
const SECONDS_PER_MIN: f64 = 60.0;

/// Source of provider-sourced routes.
///
/// Implementations issue exactly one request per call and never retry.
pub trait RouteProvider: Send + Sync {
    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = Result<RouteResult, RoutingError>> + Send;
}

/// HTTP client for an OSRM routing service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
    profile: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: [lon, lat]
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    maneuver: OsrmManeuver,
    #[serde(default)]
    name: String,
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    modifier: Option<String>,
}

impl OsrmClient {
    pub fn new(
        base_url: impl Into<String>,
        profile: impl Into<String>,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            profile: profile.into(),
        })
    }

    fn route_url(&self, origin: GeoPoint, destination: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson&steps=true",
            self.base_url,
            self.profile,
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        )
    }
}

impl RouteProvider for OsrmClient {
    async fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<RouteResult, RoutingError> {
        let url = self.route_url(origin, destination);
        tracing::debug!("Requesting route: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: OsrmResponse =
            serde_json::from_str(&body).map_err(|err| RoutingError::Malformed(err.to_string()))?;
        normalize(payload)
    }
}

/// Convert an OSRM response into a provider-agnostic route.
fn normalize(payload: OsrmResponse) -> Result<RouteResult, RoutingError> {
    if payload.code != "Ok" {
        return Err(RoutingError::Provider {
            code: payload.code,
            message: payload.message.unwrap_or_default(),
        });
    }

    let route = payload
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::Malformed("no routes in response".to_string()))?;

    let path = route
        .geometry
        .coordinates
        .iter()
        .map(|&[lon, lat]| {
            GeoPoint::new(lat, lon)
                .map_err(|err| RoutingError::Malformed(format!("geometry point: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if path.len() < 2 {
        return Err(RoutingError::Malformed(format!(
            "geometry has {} point(s), need at least 2",
            path.len()
        )));
    }

    if !is_non_negative(route.distance) || !is_non_negative(route.duration) {
        return Err(RoutingError::Malformed(format!(
            "invalid totals: distance={} duration={}",
            route.distance, route.duration
        )));
    }

    let steps = route
        .legs
        .into_iter()
        .flat_map(|leg| leg.steps)
        .map(|step| RouteStep {
            instruction: instruction_for(&step.maneuver.kind, &step.name),
            distance_km: step.distance.max(0.0) / METERS_PER_KM,
            turn_direction: step.maneuver.modifier.filter(|m| !m.trim().is_empty()),
        })
        .collect();

    Ok(RouteResult {
        path,
        steps,
        total_distance_km: route.distance / METERS_PER_KM,
        total_duration_min: route.duration / SECONDS_PER_MIN,
        is_fallback: false,
    })
}

fn instruction_for(maneuver: &str, street: &str) -> String {
    match maneuver {
        "depart" => "Start your journey".to_string(),
        "arrive" => "You have arrived at safe zone".to_string(),
        _ if !street.trim().is_empty() => street.trim().to_string(),
        _ => "Continue".to_string(),
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    const ORIGIN: GeoPoint = GeoPoint {
        lat: 19.076,
        lon: 72.8777,
    };
    const SHELTER: GeoPoint = GeoPoint {
        lat: 19.106,
        lon: 72.8777,
    };

    fn ok_body() -> Value {
        json!({
            "code": "Ok",
            "routes": [{
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[72.8777, 19.076], [72.879, 19.09], [72.8777, 19.106]]
                },
                "legs": [{
                    "steps": [
                        { "maneuver": { "type": "depart", "modifier": "" }, "name": "LBS Marg", "distance": 120.0 },
                        { "maneuver": { "type": "turn", "modifier": "left" }, "name": "Western Express Highway", "distance": 2500.0 },
                        { "maneuver": { "type": "continue" }, "name": "", "distance": 700.0 },
                        { "maneuver": { "type": "arrive" }, "name": "MMRDA Grounds", "distance": 0.0 }
                    ]
                }],
                "distance": 3320.0,
                "duration": 540.0
            }]
        })
    }

    /// Serve `app` on an ephemeral local port and return its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn normalizes_steps_and_units() {
        let payload: OsrmResponse = serde_json::from_value(ok_body()).unwrap();
        let route = normalize(payload).unwrap();

        assert!(!route.is_fallback);
        assert_eq!(route.path.first(), Some(&ORIGIN));
        assert_eq!(route.path.last(), Some(&SHELTER));
        assert!((route.total_distance_km - 3.32).abs() < 1e-9);
        assert!((route.total_duration_min - 9.0).abs() < 1e-9);

        let instructions: Vec<&str> = route.steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(
            instructions,
            [
                "Start your journey",
                "Western Express Highway",
                "Continue",
                "You have arrived at safe zone"
            ]
        );
        assert_eq!(route.steps[0].turn_direction, None);
        assert_eq!(route.steps[1].turn_direction.as_deref(), Some("left"));
        assert!((route.steps[1].distance_km - 2.5).abs() < 1e-9);
    }

    #[test]
    fn concatenates_steps_of_every_leg() {
        let mut body = ok_body();
        let extra = json!({ "steps": [
            { "maneuver": { "type": "turn", "modifier": "right" }, "name": "Link Road", "distance": 50.0 }
        ]});
        body["routes"][0]["legs"].as_array_mut().unwrap().push(extra);
        let route = normalize(serde_json::from_value(body).unwrap()).unwrap();
        assert_eq!(route.steps.len(), 5);
        assert_eq!(route.steps[4].instruction, "Link Road");
    }

    #[test]
    fn non_ok_code_is_provider_error() {
        let payload: OsrmResponse = serde_json::from_value(json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        }))
        .unwrap();
        let err = normalize(payload).unwrap_err();
        assert!(matches!(err, RoutingError::Provider { ref code, .. } if code == "NoRoute"));
    }

    #[test]
    fn single_point_geometry_is_malformed() {
        let mut body = ok_body();
        body["routes"][0]["geometry"]["coordinates"] = json!([[72.8777, 19.076]]);
        let err = normalize(serde_json::from_value(body).unwrap()).unwrap_err();
        assert!(matches!(err, RoutingError::Malformed(_)));
    }

    #[test]
    fn empty_routes_is_malformed() {
        let payload: OsrmResponse =
            serde_json::from_value(json!({ "code": "Ok", "routes": [] })).unwrap();
        assert!(matches!(normalize(payload), Err(RoutingError::Malformed(_))));
    }

    #[tokio::test]
    async fn fetches_route_over_http() {
        let app = Router::new().route(
            "/route/v1/:profile/:coords",
            get(
                |Path((profile, coords)): Path<(String, String)>,
                 Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(profile, "driving");
                    assert_eq!(coords, "72.877700,19.076000;72.877700,19.106000");
                    assert_eq!(params.get("steps").map(String::as_str), Some("true"));
                    assert_eq!(params.get("geometries").map(String::as_str), Some("geojson"));
                    assert_eq!(params.get("overview").map(String::as_str), Some("full"));
                    Json(ok_body())
                },
            ),
        );
        let base = serve(app).await;

        let client = OsrmClient::new(base, "driving").unwrap();
        let route = client.fetch_route(ORIGIN, SHELTER).await.unwrap();
        assert_eq!(route.steps.len(), 4);
        assert!((route.total_distance_km - 3.32).abs() < 1e-9);
    }

    #[tokio::test]
    async fn http_failure_status_is_reported() {
        let app = Router::new().route(
            "/route/v1/:profile/:coords",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy").into_response() }),
        );
        let base = serve(app).await;

        let client = OsrmClient::new(base, "driving").unwrap();
        let err = client.fetch_route(ORIGIN, SHELTER).await.unwrap_err();
        assert!(matches!(err, RoutingError::Status(503)));
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() {
        let app = Router::new().route(
            "/route/v1/:profile/:coords",
            get(|| async { "<html>not json</html>" }),
        );
        let base = serve(app).await;

        let client = OsrmClient::new(base, "driving").unwrap();
        let err = client.fetch_route(ORIGIN, SHELTER).await.unwrap_err();
        assert!(matches!(err, RoutingError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OsrmClient::new(format!("http://{}", addr), "driving").unwrap();
        let err = client.fetch_route(ORIGIN, SHELTER).await.unwrap_err();
        assert!(matches!(err, RoutingError::Transport(_)));
    }
}

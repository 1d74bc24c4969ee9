//! End-to-end advisory tests against an in-process server and a stand-in
//! OSRM routing provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Path, routing::get, Json, Router};
use evac_server::{api, config::Config, state::AppState};
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type AdvisoryStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serve `app` on an ephemeral local port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Routing provider that answers every request with a three-step route
/// between the requested coordinates.
async fn start_osrm(calls: Arc<AtomicUsize>) -> String {
    let app = Router::new().route(
        "/route/v1/:profile/:coords",
        get(move |Path((_profile, coords)): Path<(String, String)>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let points: Vec<Vec<f64>> = coords
                    .split(';')
                    .map(|pair| pair.split(',').map(|v| v.parse().unwrap()).collect())
                    .collect();
                Json(json!({
                    "code": "Ok",
                    "routes": [{
                        "geometry": { "type": "LineString", "coordinates": points },
                        "legs": [{ "steps": [
                            { "maneuver": { "type": "depart" }, "name": "Kurla Station Road", "distance": 400.0 },
                            { "maneuver": { "type": "turn", "modifier": "right" }, "name": "LBS Marg", "distance": 900.0 },
                            { "maneuver": { "type": "arrive" }, "name": "", "distance": 0.0 }
                        ]}],
                        "distance": 1300.0,
                        "duration": 240.0
                    }]
                }))
            }
        }),
    );
    serve(app).await
}

async fn start_server(routing_url: String) -> String {
    let config = Config {
        routing_url,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config).expect("app state"));
    serve(api::create_router().with_state(state)).await
}

#[tokio::test]
async fn provider_route_is_normalized_end_to_end() {
    let calls = Arc::new(AtomicUsize::new(0));
    let osrm = start_osrm(calls.clone()).await;
    let base = start_server(osrm).await;
    let client = Client::new();

    let body: Value = client
        .post(format!("{}/v1/advisory", base))
        .json(&json!({ "location": { "lat": 19.077, "lon": 72.9 } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(body["classification"]["status"], "critical");

    let route = &body["route"];
    assert_eq!(route["is_fallback"], false);
    assert_eq!(route["total_distance_km"].as_f64(), Some(1.3));
    assert_eq!(route["total_duration_min"].as_f64(), Some(4.0));

    let instructions: Vec<&str> = route["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["instruction"].as_str().unwrap())
        .collect();
    assert_eq!(
        instructions,
        ["Start your journey", "LBS Marg", "You have arrived at safe zone"]
    );
    assert_eq!(route["steps"][1]["turn_direction"], "right");

    let path = route["path"].as_array().unwrap();
    assert_eq!(path.first().unwrap()["lat"].as_f64(), Some(19.077));
    assert_eq!(path.last().unwrap(), &body["selected_shelter"]["location"]);
}

#[tokio::test]
async fn safe_and_shelterless_locations_never_call_the_provider() {
    let calls = Arc::new(AtomicUsize::new(0));
    let osrm = start_osrm(calls.clone()).await;

    let dir = std::env::temp_dir().join(format!("evac-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("zones.json");
    std::fs::write(
        &path,
        json!([{
            "id": "dam-breach",
            "severity": "critical",
            "reference_point": { "lat": 19.2, "lon": 73.1 },
            "shelters": []
        }])
        .to_string(),
    )
    .unwrap();

    let config = Config {
        routing_url: osrm,
        hazard_zones_path: Some(path.to_string_lossy().to_string()),
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config).expect("app state"));
    let base = serve(api::create_router().with_state(state)).await;
    let client = Client::new();

    let body: Value = client
        .post(format!("{}/v1/advisory", base))
        .json(&json!({ "location": { "lat": 19.21, "lon": 73.1 } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["classification"]["status"], "critical");
    assert_eq!(body["no_shelter_available"], true);
    assert!(body["selected_shelter"].is_null());
    assert!(body["route"].is_null());

    let body: Value = client
        .post(format!("{}/v1/advisory", base))
        .json(&json!({ "location": { "lat": 12.97, "lon": 77.59 } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["classification"]["status"], "safe");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    std::fs::remove_dir_all(&dir).ok();
}

/// Next advisory pushed on the stream, decoded from its JSON text frame.
async fn next_advisory(socket: &mut AdvisoryStream) -> Value {
    let read = async {
        while let Some(msg) = socket.next().await {
            if let Message::Text(text) = msg.unwrap() {
                return serde_json::from_str::<Value>(&text).unwrap();
            }
        }
        panic!("advisory stream closed")
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("advisory pushed within 5s")
}

#[tokio::test]
async fn stream_sends_current_advisory_then_latest_updates() {
    let calls = Arc::new(AtomicUsize::new(0));
    let osrm = start_osrm(calls.clone()).await;
    let base = start_server(osrm).await;
    let client = Client::new();

    let url = format!("{}/v1/stream", base.replacen("http://", "ws://", 1));
    let (mut socket, _) = connect_async(url).await.unwrap();

    let initial = next_advisory(&mut socket).await;
    assert_eq!(initial["sequence"], 0);
    assert!(initial["classification"].is_null());

    client
        .post(format!("{}/v1/advisory", base))
        .json(&json!({ "location": { "lat": 12.97, "lon": 77.59 } }))
        .send()
        .await
        .unwrap();

    let safe = next_advisory(&mut socket).await;
    assert_eq!(safe["sequence"], 1);
    assert_eq!(safe["classification"]["status"], "safe");
    assert_eq!(safe["location"]["lat"].as_f64(), Some(12.97));

    client
        .post(format!("{}/v1/advisory", base))
        .json(&json!({ "location": { "lat": 19.077, "lon": 72.9 } }))
        .send()
        .await
        .unwrap();

    // The loading state may be coalesced with the final one; only the
    // latest published advisory is guaranteed to arrive.
    let routed = loop {
        let advisory = next_advisory(&mut socket).await;
        assert_eq!(advisory["sequence"], 2);
        if advisory["is_route_loading"] == false {
            break advisory;
        }
        assert!(advisory["route"].is_null());
    };
    assert_eq!(routed["classification"]["status"], "critical");
    assert_eq!(routed["route"]["is_fallback"], false);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

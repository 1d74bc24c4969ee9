//! API routes for the evacuation advisory server.

pub mod advisory;
mod routes;
pub mod ws;
pub mod zones;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub use routes::create_router;

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

//! Evacuation routing - acquires a driving route to a shelter from an OSRM
//! compatible provider and falls back to a straight line when it cannot.

pub mod advisor;
pub mod client;
pub mod error;

pub use advisor::{fallback_route, RouteAdvisor, RouteAdvisorConfig, FALLBACK_INSTRUCTION};
pub use client::{OsrmClient, RouteProvider};
pub use error::RoutingError;

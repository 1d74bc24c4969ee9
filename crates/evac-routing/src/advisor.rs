//! Route acquisition with a guaranteed straight-line fallback.

use std::time::Duration;

use evac_core::{bearing_deg, compass_point, distance_km, GeoPoint, RouteResult, RouteStep};

use crate::client::RouteProvider;
use crate::error::RoutingError;

pub const FALLBACK_INSTRUCTION: &str = "Proceed directly to the safe zone";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_FALLBACK_SPEED_KMH: f64 = 30.0;

#[derive(Debug, Clone, Copy)]
pub struct RouteAdvisorConfig {
    /// Upper bound on one provider round trip
    pub timeout: Duration,
    /// Assumed average speed for fallback duration estimates
    pub fallback_speed_kmh: f64,
}

impl Default for RouteAdvisorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            fallback_speed_kmh: DEFAULT_FALLBACK_SPEED_KMH,
        }
    }
}

/// Acquires a route from a [`RouteProvider`], never failing.
#[derive(Debug, Clone)]
pub struct RouteAdvisor<P> {
    provider: P,
    config: RouteAdvisorConfig,
}

impl<P: RouteProvider> RouteAdvisor<P> {
    pub fn new(provider: P, config: RouteAdvisorConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Route from `origin` to `destination`.
    ///
    /// Issues exactly one provider request. Transport errors, bad statuses,
    /// malformed payloads and timeouts all resolve to [`fallback_route`].
    pub async fn acquire_route(&self, origin: GeoPoint, destination: GeoPoint) -> RouteResult {
        let outcome = match tokio::time::timeout(
            self.config.timeout,
            self.provider.fetch_route(origin, destination),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(RoutingError::Timeout(self.config.timeout)),
        };

        match outcome {
            Ok(route) => {
                tracing::debug!(
                    "Route acquired: {:.1} km, {:.0} min, {} steps",
                    route.total_distance_km,
                    route.total_duration_min,
                    route.steps.len()
                );
                route
            }
            Err(err) => {
                tracing::warn!("Routing failed, using straight-line fallback: {}", err);
                fallback_route(origin, destination, self.config.fallback_speed_kmh)
            }
        }
    }
}

/// Straight-line route with a duration estimated from `speed_kmh`.
pub fn fallback_route(origin: GeoPoint, destination: GeoPoint, speed_kmh: f64) -> RouteResult {
    let speed_kmh = if speed_kmh.is_finite() && speed_kmh > 0.0 {
        speed_kmh
    } else {
        DEFAULT_FALLBACK_SPEED_KMH
    };
    let total_distance_km = distance_km(origin, destination);
    let heading = (total_distance_km > 0.0)
        .then(|| compass_point(bearing_deg(origin, destination)).to_string());

    RouteResult {
        path: vec![origin, destination],
        steps: vec![RouteStep {
            instruction: FALLBACK_INSTRUCTION.to_string(),
            distance_km: total_distance_km,
            turn_direction: heading,
        }],
        total_distance_km,
        total_duration_min: total_distance_km / speed_kmh * 60.0,
        is_fallback: true,
    }
}

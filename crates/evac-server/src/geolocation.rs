//! Fallback for clients whose geolocation provider fails.

use evac_core::GeoPoint;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

/// The reported location, or `default` when the provider failed.
pub fn resolve_location(
    reported: Result<GeoPoint, GeolocationError>,
    default: GeoPoint,
) -> GeoPoint {
    match reported {
        Ok(location) => location,
        Err(err) => {
            tracing::warn!(
                "Geolocation failed ({}), using default location {:.4},{:.4}",
                err,
                default.lat,
                default.lon
            );
            default
        }
    }
}

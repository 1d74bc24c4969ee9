//! Server configuration from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use evac_core::{GeoPoint, InputError, SeverityThresholds};
use evac_routing::RouteAdvisorConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub routing_url: String,
    pub routing_profile: String,
    pub routing_timeout_s: u64,
    pub fallback_speed_kmh: f64,
    pub critical_radius_km: f64,
    pub warning_radius_km: f64,
    /// Substituted when the client cannot report a location
    pub default_lat: f64,
    pub default_lon: f64,
    /// JSON registry file; the bundled registry is used when unset
    pub hazard_zones_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            routing_url: "https://router.project-osrm.org".to_string(),
            routing_profile: "driving".to_string(),
            routing_timeout_s: 10,
            fallback_speed_kmh: 30.0,
            critical_radius_km: 20.0,
            warning_radius_km: 30.0,
            default_lat: 19.0760,
            default_lon: 72.8777,
            hazard_zones_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("EVAC_PORT", defaults.server_port),
            routing_url: env::var("ROUTING_URL").unwrap_or(defaults.routing_url),
            routing_profile: env::var("ROUTING_PROFILE").unwrap_or(defaults.routing_profile),
            routing_timeout_s: parse_env("ROUTING_TIMEOUT_S", defaults.routing_timeout_s),
            fallback_speed_kmh: parse_env("FALLBACK_SPEED_KMH", defaults.fallback_speed_kmh),
            critical_radius_km: parse_env("CRITICAL_RADIUS_KM", defaults.critical_radius_km),
            warning_radius_km: parse_env("WARNING_RADIUS_KM", defaults.warning_radius_km),
            default_lat: parse_env("DEFAULT_LAT", defaults.default_lat),
            default_lon: parse_env("DEFAULT_LON", defaults.default_lon),
            hazard_zones_path: env::var("HAZARD_ZONES_PATH")
                .ok()
                .map(|path| path.trim().to_string())
                .filter(|path| !path.is_empty()),
        }
    }

    pub fn thresholds(&self) -> SeverityThresholds {
        SeverityThresholds {
            critical_radius_km: self.critical_radius_km,
            warning_radius_km: self.warning_radius_km,
        }
    }

    pub fn route_advisor(&self) -> RouteAdvisorConfig {
        RouteAdvisorConfig {
            timeout: Duration::from_secs(self.routing_timeout_s.max(1)),
            fallback_speed_kmh: self.fallback_speed_kmh,
        }
    }

    pub fn default_location(&self) -> Result<GeoPoint, InputError> {
        GeoPoint::new(self.default_lat, self.default_lon)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

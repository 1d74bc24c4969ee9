//! Core data models for the evacuation advisory engine.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Severity tier of a hazard zone, and the status of a classified location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Evacuate now
    Critical,
    /// Prepare to evacuate
    Warning,
    /// No action needed
    Safe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Safe => "safe",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Warning),
            "safe" => Ok(Severity::Safe),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// A designated evacuation shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    pub name: String,
    pub location: GeoPoint,
}

/// A registered area of known or predicted danger.
///
/// Built by [`crate::HazardZoneRegistry::from_definitions`]; the match radius
/// comes from the severity tier and is `None` for safe zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub id: String,
    pub severity: Severity,
    pub reference_point: GeoPoint,
    pub match_radius_km: Option<f64>,
    pub shelters: Vec<Shelter>,
    #[serde(flatten)]
    pub display: ZoneDisplay,
}

/// Presentation metadata. Never consulted by classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDisplay {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub affected: Option<u64>,
    #[serde(default)]
    pub evacuation_routes: Vec<String>,
}

/// Configuration record for one hazard zone, as loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub id: String,
    pub severity: Severity,
    pub reference_point: GeoPoint,
    /// Only accepted when it restates the radius of the severity tier
    #[serde(default)]
    pub match_radius_km: Option<f64>,
    #[serde(default)]
    pub shelters: Vec<Shelter>,
    #[serde(flatten)]
    pub display: ZoneDisplay,
}

/// Outcome of classifying one location against the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub status: Severity,
    pub matched_zone: Option<HazardZone>,
    pub distance_km: Option<f64>,
}

impl ClassificationResult {
    pub fn safe() -> Self {
        Self {
            status: Severity::Safe,
            matched_zone: None,
            distance_km: None,
        }
    }

    pub fn requires_evacuation(&self) -> bool {
        self.status != Severity::Safe && self.matched_zone.is_some()
    }
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_km: f64,
    pub turn_direction: Option<String>,
}

/// Provider-agnostic route from a location to a shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// At least two points, origin first.
    pub path: Vec<GeoPoint>,
    pub steps: Vec<RouteStep>,
    pub total_distance_km: f64,
    pub total_duration_min: f64,
    /// Straight-line estimate, not provider-sourced
    pub is_fallback: bool,
}

/// Everything the presentation layer needs for one location.
///
/// Always replaced wholesale; fields are never updated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryState {
    pub location: Option<GeoPoint>,
    pub classification: Option<ClassificationResult>,
    pub selected_shelter: Option<Shelter>,
    pub route: Option<RouteResult>,
    pub is_route_loading: bool,
    /// Matched zone lists no shelters, so there is nothing to route to
    #[serde(default)]
    pub no_shelter_available: bool,
}

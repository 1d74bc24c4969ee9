//! Proximity classification of a location against the hazard registry.
//!
//! Severity is strictly prioritized over distance: critical zones are
//! evaluated first and exclusively, and warning zones are only consulted
//! when no critical zone matches.

use crate::geo::{distance_km, GeoPoint};
use crate::models::{ClassificationResult, HazardZone, Severity};
use crate::registry::HazardZoneRegistry;

/// Classify `location` as critical, warning, or safe.
///
/// A zone matches when the distance to its reference point is strictly less
/// than its match radius. Among matching zones of the same tier the nearest
/// wins; equal distances go to the zone listed first.
pub fn classify(location: GeoPoint, registry: &HazardZoneRegistry) -> ClassificationResult {
    for severity in [Severity::Critical, Severity::Warning] {
        if let Some((zone, distance)) = nearest_match(location, registry.zones_by_severity(severity))
        {
            return ClassificationResult {
                status: severity,
                matched_zone: Some(zone.clone()),
                distance_km: Some(distance),
            };
        }
    }
    ClassificationResult::safe()
}

fn nearest_match<'a>(
    location: GeoPoint,
    zones: impl Iterator<Item = &'a HazardZone>,
) -> Option<(&'a HazardZone, f64)> {
    let mut best: Option<(&HazardZone, f64)> = None;

    for zone in zones {
        let Some(radius) = zone.match_radius_km else {
            continue;
        };
        let distance = distance_km(location, zone.reference_point);
        if distance >= radius {
            continue;
        }
        // Strict comparison keeps the earlier zone on ties.
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((zone, distance));
        }
    }

    best
}

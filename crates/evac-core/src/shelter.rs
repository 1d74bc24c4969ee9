//! Shelter selection for a matched hazard zone.

use crate::geo::{distance_km, GeoPoint};
use crate::models::{HazardZone, Shelter};

/// Nearest shelter of `zone` to `location`, first listed on ties.
///
/// `None` means the zone has no evacuation target and no route should be
/// requested.
pub fn select_shelter(location: GeoPoint, zone: &HazardZone) -> Option<Shelter> {
    nearest_shelter(location, &zone.shelters).map(|(shelter, _)| shelter.clone())
}

/// Nearest shelter in `shelters` together with its distance in kilometers.
pub fn nearest_shelter(location: GeoPoint, shelters: &[Shelter]) -> Option<(&Shelter, f64)> {
    shelters
        .iter()
        .map(|shelter| (shelter, distance_km(location, shelter.location)))
        .fold(None, |best, candidate| match best {
            Some((_, d)) if candidate.1 >= d => best,
            _ => Some(candidate),
        })
}

//! Evacuation advisory core: hazard proximity classification and shelter
//! selection over a read-only registry of hazard zones.

pub mod classifier;
pub mod geo;
pub mod models;
pub mod registry;
pub mod rules;
pub mod shelter;

pub use classifier::classify;
pub use geo::{bearing_deg, compass_point, distance_km, GeoPoint, InputError, EARTH_RADIUS_KM};
pub use models::{
    AdvisoryState, ClassificationResult, HazardZone, RouteResult, RouteStep, Severity, Shelter,
    ZoneDefinition, ZoneDisplay,
};
pub use registry::{HazardZoneRegistry, RegistryError, ZoneDistance, ZoneQuery};
pub use rules::SeverityThresholds;
pub use shelter::{nearest_shelter, select_shelter};

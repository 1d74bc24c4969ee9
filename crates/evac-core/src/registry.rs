//! Catalog of hazard zones.
//!
//! Loaded once from configuration and read-only afterwards, so a single
//! registry can be shared behind an `Arc` by every advisory request.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::geo::{distance_km, GeoPoint, InputError};
use crate::models::{HazardZone, Severity, ZoneDefinition};
use crate::rules::SeverityThresholds;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate hazard zone id '{0}'")]
    DuplicateId(String),
    #[error("hazard zone '{id}' has an invalid reference point: {source}")]
    InvalidReferencePoint { id: String, source: InputError },
    #[error("shelter '{shelter}' of zone '{id}' has an invalid location: {source}")]
    InvalidShelter {
        id: String,
        shelter: String,
        source: InputError,
    },
    #[error("match radius for {0} zones must be > 0, got {1}")]
    InvalidRadius(Severity, f64),
    #[error("hazard zone '{id}' sets match radius {radius} km; radius comes from the {severity} tier")]
    RadiusOverride {
        id: String,
        severity: Severity,
        radius: f64,
    },
}

/// Filters for [`HazardZoneRegistry::nearby`].
#[derive(Debug, Clone, Default)]
pub struct ZoneQuery {
    pub severity: Option<Severity>,
    /// Case-insensitive match against zone name and message
    pub text: Option<String>,
}

/// A zone paired with its distance from a query location.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneDistance<'a> {
    pub zone: &'a HazardZone,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HazardZoneRegistry {
    zones: Vec<HazardZone>,
}

impl HazardZoneRegistry {
    /// Validate definitions and assign each zone the radius of its tier.
    pub fn from_definitions(
        definitions: Vec<ZoneDefinition>,
        thresholds: &SeverityThresholds,
    ) -> Result<Self, RegistryError> {
        for severity in [Severity::Critical, Severity::Warning] {
            if let Some(radius) = thresholds.radius_for(severity) {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(RegistryError::InvalidRadius(severity, radius));
                }
            }
        }

        let mut seen = HashSet::new();
        let mut zones = Vec::with_capacity(definitions.len());

        for def in definitions {
            if !seen.insert(def.id.clone()) {
                return Err(RegistryError::DuplicateId(def.id));
            }
            def.reference_point
                .validate()
                .map_err(|source| RegistryError::InvalidReferencePoint {
                    id: def.id.clone(),
                    source,
                })?;
            for shelter in &def.shelters {
                shelter
                    .location
                    .validate()
                    .map_err(|source| RegistryError::InvalidShelter {
                        id: def.id.clone(),
                        shelter: shelter.name.clone(),
                        source,
                    })?;
            }

            let match_radius_km = thresholds.radius_for(def.severity);
            if let Some(radius) = def.match_radius_km {
                if match_radius_km != Some(radius) {
                    return Err(RegistryError::RadiusOverride {
                        id: def.id,
                        severity: def.severity,
                        radius,
                    });
                }
            }

            zones.push(HazardZone {
                match_radius_km,
                id: def.id,
                severity: def.severity,
                reference_point: def.reference_point,
                shelters: def.shelters,
                display: def.display,
            });
        }

        Ok(Self { zones })
    }

    /// Full catalog in insertion order.
    pub fn all_zones(&self) -> &[HazardZone] {
        &self.zones
    }

    pub fn zones_by_severity(&self, severity: Severity) -> impl Iterator<Item = &HazardZone> {
        self.zones.iter().filter(move |z| z.severity == severity)
    }

    pub fn get(&self, id: &str) -> Option<&HazardZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones matching `query`, nearest first. Equal distances keep insertion order.
    pub fn nearby<'a>(&'a self, location: GeoPoint, query: &ZoneQuery) -> Vec<ZoneDistance<'a>> {
        let mut results: Vec<ZoneDistance<'a>> = self
            .filter(query)
            .map(|zone| ZoneDistance {
                zone,
                distance_km: distance_km(location, zone.reference_point),
            })
            .collect();
        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        results
    }

    /// Zones matching `query` in insertion order.
    pub fn filter<'a>(&'a self, query: &ZoneQuery) -> impl Iterator<Item = &'a HazardZone> {
        let severity = query.severity;
        let needle = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        self.zones.iter().filter(move |zone| {
            if let Some(severity) = severity {
                if zone.severity != severity {
                    return false;
                }
            }
            match needle.as_deref() {
                Some(needle) => [&zone.display.name, &zone.display.message]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(needle)),
                None => true,
            }
        })
    }
}

//! Match thresholds per severity tier.

use serde::{Deserialize, Serialize};

use crate::models::Severity;

/// Distance within which a zone of a given tier affects a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub critical_radius_km: f64,
    pub warning_radius_km: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical_radius_km: 20.0,
            warning_radius_km: 30.0,
        }
    }
}

impl SeverityThresholds {
    /// Match radius for a tier. Safe zones never trigger evacuation.
    pub fn radius_for(&self, severity: Severity) -> Option<f64> {
        match severity {
            Severity::Critical => Some(self.critical_radius_km),
            Severity::Warning => Some(self.warning_radius_km),
            Severity::Safe => None,
        }
    }
}

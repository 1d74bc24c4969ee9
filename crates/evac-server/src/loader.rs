//! Hazard zone registry loading.

use std::fs;

use anyhow::{Context, Result};
use evac_core::{HazardZoneRegistry, ZoneDefinition};

use crate::config::Config;

/// Mumbai flood zones shipped with the server.
const BUNDLED_ZONES: &str = include_str!("../data/hazard_zones.json");

/// Load the registry from `HAZARD_ZONES_PATH`, or the bundled set when unset.
pub fn load_registry(config: &Config) -> Result<HazardZoneRegistry> {
    let (source, raw) = match config.hazard_zones_path.as_deref() {
        Some(path) => (
            path.to_string(),
            fs::read_to_string(path)
                .with_context(|| format!("reading hazard zones from {}", path))?,
        ),
        None => ("bundled registry".to_string(), BUNDLED_ZONES.to_string()),
    };

    let registry = registry_from_json(&raw, config)
        .with_context(|| format!("loading hazard zones from {}", source))?;
    tracing::info!("Loaded {} hazard zones from {}", registry.len(), source);
    Ok(registry)
}

pub fn registry_from_json(raw: &str, config: &Config) -> Result<HazardZoneRegistry> {
    let definitions: Vec<ZoneDefinition> =
        serde_json::from_str(raw).context("parsing hazard zone definitions")?;
    Ok(HazardZoneRegistry::from_definitions(
        definitions,
        &config.thresholds(),
    )?)
}

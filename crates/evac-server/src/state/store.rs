//! Application state shared by every request handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use evac_core::{GeoPoint, HazardZoneRegistry};
use evac_routing::{OsrmClient, RouteAdvisor};

use crate::advisory::AdvisoryOrchestrator;
use crate::config::Config;
use crate::loader;

pub struct AppState {
    config: Config,
    default_location: GeoPoint,
    orchestrator: AdvisoryOrchestrator<OsrmClient>,
}

impl AppState {
    /// Build state with the registry named by the configuration.
    pub fn new(config: Config) -> Result<Self> {
        let registry = loader::load_registry(&config)?;
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: Config, registry: HazardZoneRegistry) -> Result<Self> {
        let default_location = config
            .default_location()
            .context("DEFAULT_LAT/DEFAULT_LON must be a valid coordinate")?;
        let client = OsrmClient::new(config.routing_url.clone(), config.routing_profile.clone())
            .context("building routing client")?;
        let router = RouteAdvisor::new(client, config.route_advisor());

        Ok(Self {
            orchestrator: AdvisoryOrchestrator::new(Arc::new(registry), router),
            default_location,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn default_location(&self) -> GeoPoint {
        self.default_location
    }

    pub fn registry(&self) -> &HazardZoneRegistry {
        self.orchestrator.registry()
    }

    pub fn orchestrator(&self) -> &AdvisoryOrchestrator<OsrmClient> {
        &self.orchestrator
    }
}

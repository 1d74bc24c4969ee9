//! Advisory orchestration: location -> classification -> shelter -> route.
//!
//! Each `advise` call is tagged with a sequence number when it starts. Only
//! the most recently started call may publish; a slow earlier call that
//! completes after a newer one has started is discarded.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use evac_core::{
    classify, select_shelter, AdvisoryState, GeoPoint, HazardZoneRegistry, InputError,
};
use evac_routing::{RouteAdvisor, RouteProvider};
use serde::Serialize;
use tokio::sync::watch;

/// The externally observed advisory.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedAdvisory {
    pub sequence: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: AdvisoryState,
}

pub struct AdvisoryOrchestrator<P> {
    registry: Arc<HazardZoneRegistry>,
    router: RouteAdvisor<P>,
    /// Sequence number of the most recently started invocation
    latest_started: Mutex<u64>,
    tx: watch::Sender<Arc<PublishedAdvisory>>,
}

impl<P: RouteProvider> AdvisoryOrchestrator<P> {
    pub fn new(registry: Arc<HazardZoneRegistry>, router: RouteAdvisor<P>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(PublishedAdvisory {
            sequence: 0,
            updated_at: Utc::now(),
            state: AdvisoryState::default(),
        }));
        Self {
            registry,
            router,
            latest_started: Mutex::new(0),
            tx,
        }
    }

    pub fn registry(&self) -> &HazardZoneRegistry {
        &self.registry
    }

    pub fn router(&self) -> &RouteAdvisor<P> {
        &self.router
    }

    /// Latest published advisory.
    pub fn current(&self) -> Arc<PublishedAdvisory> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PublishedAdvisory>> {
        self.tx.subscribe()
    }

    /// Run the advisory pipeline for `location`.
    ///
    /// Returns the state computed for this call. Whether it was published
    /// depends on no newer call having started in the meantime.
    pub async fn advise(&self, location: GeoPoint) -> Result<AdvisoryState, InputError> {
        location.validate()?;
        let sequence = self.begin();

        let classification = classify(location, &self.registry);
        tracing::debug!(
            "Advisory #{} at {:.4},{:.4}: {}",
            sequence,
            location.lat,
            location.lon,
            classification.status
        );

        let shelter = match classification.matched_zone.as_ref() {
            Some(zone) if classification.requires_evacuation() => select_shelter(location, zone),
            _ => None,
        };

        let Some(shelter) = shelter else {
            let no_shelter_available = classification.requires_evacuation();
            if no_shelter_available {
                tracing::warn!(
                    "Hazard zone {} has no shelters; no evacuation target",
                    classification
                        .matched_zone
                        .as_ref()
                        .map(|z| z.id.as_str())
                        .unwrap_or_default()
                );
            }
            let state = AdvisoryState {
                location: Some(location),
                classification: Some(classification),
                no_shelter_available,
                ..AdvisoryState::default()
            };
            self.publish(sequence, state.clone());
            return Ok(state);
        };

        let destination = shelter.location;
        let loading = AdvisoryState {
            location: Some(location),
            classification: Some(classification),
            selected_shelter: Some(shelter),
            route: None,
            is_route_loading: true,
            no_shelter_available: false,
        };
        self.publish(sequence, loading.clone());

        let route = self.router.acquire_route(location, destination).await;

        let state = AdvisoryState {
            route: Some(route),
            is_route_loading: false,
            ..loading
        };
        if !self.publish(sequence, state.clone()) {
            tracing::debug!("Advisory #{} superseded, result discarded", sequence);
        }
        Ok(state)
    }

    fn begin(&self) -> u64 {
        let mut latest = self
            .latest_started
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *latest += 1;
        *latest
    }

    /// Replace the published state if `sequence` is still the latest started.
    fn publish(&self, sequence: u64, state: AdvisoryState) -> bool {
        let latest = self
            .latest_started
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *latest != sequence {
            return false;
        }
        self.tx.send_replace(Arc::new(PublishedAdvisory {
            sequence,
            updated_at: Utc::now(),
            state,
        }));
        true
    }
}

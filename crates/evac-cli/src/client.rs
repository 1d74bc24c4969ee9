//! HTTP client for the advisory server.

use anyhow::{bail, Context, Result};
use evac_core::{AdvisoryState, GeoPoint, HazardZone, Severity};
use serde::Deserialize;
use serde_json::{json, Value};

pub struct AdvisoryClient {
    base_url: String,
    client: reqwest::Client,
}

/// A zone as returned by `/v1/zones`.
#[derive(Debug, Deserialize)]
pub struct ZoneListing {
    #[serde(flatten)]
    pub zone: HazardZone,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

impl AdvisoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Request an advisory. `None` asks the server to use its default location.
    pub async fn advise(&self, location: Option<GeoPoint>) -> Result<AdvisoryState> {
        let url = format!("{}/v1/advisory", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "location": location }))
            .send()
            .await
            .with_context(|| format!("POST {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            bail!(
                "advisory request failed ({}): {}",
                status,
                body["error"].as_str().unwrap_or("unknown error")
            );
        }
        Ok(response.json().await?)
    }

    pub async fn zones(
        &self,
        severity: Option<Severity>,
        near: Option<GeoPoint>,
    ) -> Result<Vec<ZoneListing>> {
        let url = format!("{}/v1/zones", self.base_url);
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(severity) = severity {
            query.push(("severity", severity.to_string()));
        }
        if let Some(point) = near {
            query.push(("lat", point.lat.to_string()));
            query.push(("lon", point.lon.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

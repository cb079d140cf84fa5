//! Fleet catalog HTTP client.
//!
//! The catalog owns the drone, service-point, availability, restricted-area
//! and dispatch records. The planner treats everything it returns as an
//! immutable snapshot for the duration of one planning call.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use medilift_core::models::{Drone, MedDispatch, RestrictedArea, ServicePoint, ServicePointRoster};
use medilift_core::planner::FleetSnapshot;

/// HTTP client for the fleet catalog service.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    pub async fn drones(&self) -> Result<Vec<Drone>> {
        self.get_json("/drones").await
    }

    pub async fn drone(&self, id: u32) -> Result<Option<Drone>> {
        Ok(self.drones().await?.into_iter().find(|drone| drone.id == id))
    }

    pub async fn service_points(&self) -> Result<Vec<ServicePoint>> {
        self.get_json("/service-points").await
    }

    pub async fn service_point(&self, id: u32) -> Result<Option<ServicePoint>> {
        Ok(self
            .service_points()
            .await?
            .into_iter()
            .find(|point| point.id == id))
    }

    pub async fn rosters(&self) -> Result<Vec<ServicePointRoster>> {
        self.get_json("/drones-for-service-points").await
    }

    pub async fn restricted_areas(&self) -> Result<Vec<RestrictedArea>> {
        self.get_json("/restricted-areas").await
    }

    pub async fn dispatches(&self) -> Result<Vec<MedDispatch>> {
        self.get_json("/api/v1/dispatches").await
    }

    pub async fn dispatch(&self, id: u32) -> Result<MedDispatch> {
        self.get_json(&format!("/api/v1/dispatches/{id}")).await
    }

    /// Fetch the four collections a planning call needs, up front.
    pub async fn snapshot(&self) -> Result<FleetSnapshot> {
        Ok(FleetSnapshot {
            drones: self.drones().await?,
            service_points: self.service_points().await?,
            rosters: self.rosters().await?,
            restricted_areas: self.restricted_areas().await?,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("fetching {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("catalog request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("catalog returned an error status for {url}"))?;
        response
            .json()
            .await
            .with_context(|| format!("invalid catalog payload from {url}"))
    }
}

use std::env;

use async_trait::async_trait;
use itertools::Itertools;
use model::{coordinate::Coordinate, traffic::TrafficSegment};
use serde::Deserialize;
use tracking::provider::{ProviderError, TrafficProvider};

use crate::expand_segments;

pub const TOMTOM_API_URL: &str = "https://api.tomtom.com/routing/1/calculateRoute";

/// Traffic client against the TomTom routing API, which reports live and
/// freeflow travel times along a route. Without an API key every request
/// degrades at call time; the aggregator then simply shows no overlay.
pub struct TomTomClient {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl TomTomClient {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: Some(api_key.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Reads the API key from `TOMTOM_API_KEY`.
    pub fn from_env() -> Self {
        let api_key = env::var("TOMTOM_API_KEY").ok();
        if api_key.is_none() {
            log::warn!(
                "TOMTOM_API_KEY is not set, the traffic overlay will be empty"
            );
        }
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Route level speed measurement through the given waypoints.
    pub async fn measure(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<RouteSummary, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured("TOMTOM_API_KEY".to_owned())
        })?;

        let locations = waypoints
            .iter()
            .map(|waypoint| {
                format!("{},{}", waypoint.latitude, waypoint.longitude)
            })
            .join(":");
        let url = format!("{TOMTOM_API_URL}/{locations}/json");
        log::info!("requesting traffic along {} waypoints", waypoints.len());

        let response: CalculateRouteResponse = self
            .client
            .get(&url)
            .query(&[
                ("key", api_key),
                ("traffic", "true"),
                ("travelMode", "truck"),
                ("departAt", "now"),
            ])
            .send()
            .await
            .map_err(ProviderError::transport)?
            .json()
            .await
            .map_err(ProviderError::transport)?;

        response
            .routes
            .into_iter()
            .next()
            .map(|route| route.summary)
            .ok_or(ProviderError::NoRoute)
    }
}

#[async_trait]
impl TrafficProvider for TomTomClient {
    async fn fetch_traffic(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<TrafficSegment>, ProviderError> {
        let summary = self.measure(waypoints).await?;
        Ok(expand_segments(
            waypoints,
            summary.current_speed_kph(),
            summary.freeflow_speed_kph(),
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRouteResponse {
    #[serde(default)]
    pub routes: Vec<TomTomRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomTomRoute {
    pub summary: RouteSummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub length_in_meters: f64,
    pub travel_time_in_seconds: f64,
    /// absent when the API was queried without live traffic
    #[serde(default)]
    pub no_traffic_travel_time_in_seconds: Option<f64>,
}

impl RouteSummary {
    pub fn current_speed_kph(&self) -> f64 {
        if self.travel_time_in_seconds > 0.0 {
            self.length_in_meters / self.travel_time_in_seconds * 3.6
        } else {
            0.0
        }
    }

    pub fn freeflow_speed_kph(&self) -> f64 {
        let baseline = self
            .no_traffic_travel_time_in_seconds
            .unwrap_or(self.travel_time_in_seconds);
        if baseline > 0.0 {
            self.length_in_meters / baseline * 3.6
        } else {
            self.current_speed_kph()
        }
    }
}

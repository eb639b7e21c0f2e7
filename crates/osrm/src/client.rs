use std::env;

use async_trait::async_trait;
use itertools::Itertools;
use model::coordinate::Coordinate;
use serde::Deserialize;
use tracking::provider::{ProviderError, RouteProvider};

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Routing client against an OSRM `route/v1` compatible endpoint.
/// Answers are GeoJSON polylines; only the first route candidate is ever
/// consumed.
pub struct OsrmClient {
    base_url: String,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Reads the endpoint from `OSRM_URL`, falling back to the public
    /// demo server.
    pub fn from_env() -> Self {
        Self::new(
            env::var("OSRM_URL").unwrap_or_else(|_| DEFAULT_OSRM_URL.to_owned()),
        )
    }

    // OSRM wants lon,lat pairs joined by semicolons.
    fn coordinates_path(waypoints: &[Coordinate]) -> String {
        waypoints
            .iter()
            .map(|waypoint| {
                format!("{},{}", waypoint.longitude, waypoint.latitude)
            })
            .join(";")
    }

    /// Full route request, including the summary (length and duration)
    /// the polyline alone does not carry.
    pub async fn route(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<OsrmRoute, ProviderError> {
        let url = format!(
            "{}/route/v1/driving/{}",
            self.base_url,
            Self::coordinates_path(waypoints)
        );
        log::info!("requesting route through {} waypoints", waypoints.len());

        let response: RouteResponse = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await
            .map_err(ProviderError::transport)?
            .json()
            .await
            .map_err(ProviderError::transport)?;

        if response.code != "Ok" {
            return Err(ProviderError::InvalidPayload(format!(
                "osrm answered with code '{}'",
                response.code
            )));
        }
        response
            .routes
            .into_iter()
            .next()
            .ok_or(ProviderError::NoRoute)
    }

    /// Snaps a raw coordinate to the nearest road. Falls back to the
    /// original coordinate when the provider has no answer, so callers
    /// never lose the fix.
    pub async fn snap_to_road(&self, coordinate: Coordinate) -> Coordinate {
        let url = format!(
            "{}/nearest/v1/driving/{},{}",
            self.base_url, coordinate.longitude, coordinate.latitude
        );
        let response: Result<NearestResponse, _> = async {
            self.client
                .get(&url)
                .send()
                .await?
                .json::<NearestResponse>()
                .await
        }
        .await;

        match response {
            Ok(nearest) if nearest.code == "Ok" => nearest
                .waypoints
                .first()
                .map(|waypoint| waypoint.coordinate())
                .unwrap_or(coordinate),
            Ok(nearest) => {
                log::warn!("snap to road answered with code '{}'", nearest.code);
                coordinate
            }
            Err(why) => {
                log::warn!("snap to road failed: {why}");
                coordinate
            }
        }
    }
}

#[async_trait]
impl RouteProvider for OsrmClient {
    async fn fetch_route(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<Coordinate>, ProviderError> {
        self.route(waypoints).await.map(|route| route.polyline())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    pub geometry: RouteGeometryDto,
    /// meters
    pub distance: f64,
    /// seconds
    pub duration: f64,
}

impl OsrmRoute {
    /// The dense route polyline in latitude/longitude order.
    pub fn polyline(&self) -> Vec<Coordinate> {
        self.geometry
            .coordinates
            .iter()
            .map(|&[longitude, latitude]| Coordinate::new(latitude, longitude))
            .collect()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    pub fn duration_min(&self) -> f64 {
        self.duration / 60.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteGeometryDto {
    /// GeoJSON order: `[longitude, latitude]`
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearestResponse {
    pub code: String,
    #[serde(default)]
    pub waypoints: Vec<NearestWaypoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearestWaypoint {
    /// GeoJSON order: `[longitude, latitude]`
    pub location: [f64; 2],
}

impl NearestWaypoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.location[1], self.location[0])
    }
}

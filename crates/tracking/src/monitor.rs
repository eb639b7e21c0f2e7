use model::{
    coordinate::Coordinate, fix::VehicleFix, progress::RouteProgress,
    stop::Stop, traffic::TrafficSegment,
};
use tokio::sync::RwLock;

use crate::{
    provider::{RouteProvider, TrafficProvider},
    signature::RouteSignature,
    state::{Applied, RouteChange, TripState},
};

/// Live tracking engine for one trip.
///
/// All mutation happens in short synchronous sections on the inner
/// [`TripState`]; the lock is never held across a provider await.
/// In-flight fetches are not cancelled when the route changes, the
/// signature gate simply renders their completions inert. Fixes may
/// arrive while fetches are in flight; each one is an independent,
/// idempotent recomputation against whatever geometry is current.
pub struct TripMonitor<R, T>
where
    R: RouteProvider,
    T: TrafficProvider,
{
    state: RwLock<TripState>,
    route_provider: R,
    traffic_provider: T,
}

impl<R, T> TripMonitor<R, T>
where
    R: RouteProvider,
    T: TrafficProvider,
{
    pub fn new(route_provider: R, traffic_provider: T) -> Self {
        Self {
            state: RwLock::new(TripState::new()),
            route_provider,
            traffic_provider,
        }
    }

    /// Replaces the planned route. On a signature change the derived
    /// state is cleared immediately and geometry and traffic are fetched
    /// for the new signature, concurrently. Returns the signature now in
    /// effect, or None when the list does not form a route.
    pub async fn set_stops(&self, stops: Vec<Stop>) -> Option<RouteSignature> {
        let (change, waypoints) = {
            let mut state = self.state.write().await;
            let change = state.set_stops(stops);
            (change, state.waypoints())
        };

        match change {
            RouteChange::Replaced(signature) => {
                self.refresh_for(signature.clone(), waypoints).await;
                Some(signature)
            }
            RouteChange::Unchanged => self.signature().await,
            RouteChange::Cleared => None,
        }
    }

    /// Re-fetches geometry and traffic for the current signature, e.g. to
    /// periodically renew the traffic overlay. No-op without a route.
    pub async fn refresh(&self) {
        let (signature, waypoints) = {
            let state = self.state.read().await;
            (state.signature().cloned(), state.waypoints())
        };
        if let Some(signature) = signature {
            self.refresh_for(signature, waypoints).await;
        }
    }

    async fn refresh_for(
        &self,
        signature: RouteSignature,
        waypoints: Vec<Coordinate>,
    ) {
        let (route, traffic) = futures::join!(
            self.route_provider.fetch_route(&waypoints),
            self.traffic_provider.fetch_traffic(&waypoints),
        );

        let mut state = self.state.write().await;
        match route {
            Ok(points) => {
                if state.apply_geometry(&signature, points) == Applied::Stale {
                    log::debug!(
                        "route geometry for {signature} arrived after the route changed"
                    );
                }
            }
            // a failed fetch leaves the store empty; progress reports "no
            // route" until a later refresh succeeds.
            Err(why) => log::warn!("route geometry fetch failed: {why}"),
        }
        match traffic {
            Ok(segments) => {
                state.apply_traffic(&signature, segments);
            }
            // traffic is an enhancement, not a correctness requirement;
            // degrade to an empty overlay.
            Err(why) => {
                log::warn!("traffic fetch failed: {why}");
                state.apply_traffic(&signature, vec![]);
            }
        }
    }

    /// Feeds a raw GPS fix through the engine. Returns the derived
    /// progress, or None while no route geometry is available.
    pub async fn update_position(
        &self,
        fix: VehicleFix,
    ) -> Option<RouteProgress> {
        self.state.write().await.update_position(&fix)
    }

    /// Clears every artifact of the tracked trip (route view closed).
    pub async fn teardown(&self) {
        self.state.write().await.clear();
    }

    pub async fn signature(&self) -> Option<RouteSignature> {
        self.state.read().await.signature().cloned()
    }

    pub async fn progress(&self) -> Option<RouteProgress> {
        self.state.read().await.progress().cloned()
    }

    pub async fn traffic(&self) -> Vec<TrafficSegment> {
        self.state.read().await.traffic().to_vec()
    }

    pub async fn stops(&self) -> Vec<Stop> {
        self.state.read().await.stops().to_vec()
    }

    /// The full route polyline, for drawing the base route line.
    pub async fn route_polyline(&self) -> Vec<Coordinate> {
        self.state
            .read()
            .await
            .geometry()
            .map(|geometry| geometry.points().to_vec())
            .unwrap_or_default()
    }

    /// Forward path for the progress overlay; empty without route or fix.
    pub async fn remaining_path(&self) -> Vec<Coordinate> {
        self.state.read().await.remaining_path()
    }
}

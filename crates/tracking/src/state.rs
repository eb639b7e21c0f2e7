use model::{
    coordinate::Coordinate, fix::VehicleFix, progress::RouteProgress,
    stop::Stop, traffic::TrafficSegment,
};

use crate::{
    geometry::RouteGeometry,
    progress::{compute_progress, remaining_path},
    signature::{compute_signature, RouteSignature},
    traffic::active_segments,
};

/// Outcome of applying an asynchronous fetch result to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    /// The result was computed for a signature that is no longer current
    /// and was dropped without touching the state. Not an error, just a
    /// silent no-op.
    Stale,
}

/// What a new stop list did to the active route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteChange {
    Unchanged,
    /// The signature changed. All derived state has been cleared and new
    /// fetches should be issued for the returned signature.
    Replaced(RouteSignature),
    /// Fewer than two stops: there is no route to track.
    Cleared,
}

/// All engine state for one tracked trip.
///
/// Purely synchronous. The asynchronous orchestration (and the locking
/// that goes with it) lives in [`crate::monitor::TripMonitor`]; here every
/// transition is a plain method so the gating rules stay testable without
/// a runtime.
#[derive(Debug, Default)]
pub struct TripState {
    stops: Vec<Stop>,
    signature: Option<RouteSignature>,
    geometry: Option<RouteGeometry>,
    traffic: Vec<TrafficSegment>,
    progress: Option<RouteProgress>,
}

impl TripState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stop list. On a signature change all derived state is
    /// cleared synchronously, before any fetch for the new route can even
    /// start, so artifacts of the old and new route never mix. A stop
    /// list that only changed in arrival times or ETAs keeps signature
    /// and derived state.
    pub fn set_stops(&mut self, stops: Vec<Stop>) -> RouteChange {
        let next = compute_signature(&stops).ok();
        self.stops = stops;

        if next == self.signature {
            return match next {
                Some(_) => RouteChange::Unchanged,
                None => RouteChange::Cleared,
            };
        }

        self.clear_derived();
        self.signature = next.clone();
        match next {
            Some(signature) => RouteChange::Replaced(signature),
            None => RouteChange::Cleared,
        }
    }

    /// Stores a freshly fetched route polyline, unless the route has
    /// changed since the fetch was started.
    pub fn apply_geometry(
        &mut self,
        fetched_for: &RouteSignature,
        points: Vec<Coordinate>,
    ) -> Applied {
        if Some(fetched_for) != self.signature.as_ref() {
            log::debug!("discarding stale geometry for {fetched_for}");
            return Applied::Stale;
        }
        self.geometry = Some(RouteGeometry::build(points));
        // progress derived from the previous geometry is meaningless now;
        // the next fix recomputes it against the rebuilt polyline.
        self.progress = None;
        Applied::Fresh
    }

    /// Stores a freshly fetched traffic report, unless the route has
    /// changed since the fetch was started. The exposed list replaces the
    /// previous one and only carries segments with elevated levels.
    pub fn apply_traffic(
        &mut self,
        fetched_for: &RouteSignature,
        segments: Vec<TrafficSegment>,
    ) -> Applied {
        if Some(fetched_for) != self.signature.as_ref() {
            log::debug!("discarding stale traffic for {fetched_for}");
            return Applied::Stale;
        }
        self.traffic = active_segments(segments);
        Applied::Fresh
    }

    /// Recomputes progress for a raw fix against the current geometry.
    /// Without a trackable geometry the progress is cleared instead.
    pub fn update_position(&mut self, fix: &VehicleFix) -> Option<RouteProgress> {
        self.progress = self
            .geometry
            .as_ref()
            .and_then(|geometry| compute_progress(geometry, fix));
        self.progress.clone()
    }

    /// Full teardown when the route view is closed.
    pub fn clear(&mut self) {
        self.stops.clear();
        self.signature = None;
        self.clear_derived();
    }

    fn clear_derived(&mut self) {
        self.geometry = None;
        self.traffic.clear();
        self.progress = None;
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Stop locations in route order, the waypoints provider fetches are
    /// made with.
    pub fn waypoints(&self) -> Vec<Coordinate> {
        self.stops.iter().map(|stop| stop.location).collect()
    }

    pub fn signature(&self) -> Option<&RouteSignature> {
        self.signature.as_ref()
    }

    pub fn geometry(&self) -> Option<&RouteGeometry> {
        self.geometry.as_ref()
    }

    pub fn traffic(&self) -> &[TrafficSegment] {
        &self.traffic
    }

    pub fn progress(&self) -> Option<&RouteProgress> {
        self.progress.as_ref()
    }

    /// Forward path for the progress overlay; empty without route or fix.
    pub fn remaining_path(&self) -> Vec<Coordinate> {
        match (self.geometry.as_ref(), self.progress.as_ref()) {
            (Some(geometry), Some(progress)) => {
                remaining_path(geometry, progress)
            }
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use model::traffic::TrafficLevel;
    use utility::id::Id;

    use super::*;

    fn stop(id: &str, latitude: f64, longitude: f64) -> Stop {
        Stop {
            id: Id::new(id.to_owned()),
            name: None,
            sequence: 0,
            location: Coordinate::new(latitude, longitude),
            arrival_time: None,
            eta_seconds: None,
        }
    }

    fn segment(traffic_level: TrafficLevel) -> TrafficSegment {
        TrafficSegment {
            start: Coordinate::new(0.0, 0.0),
            end: Coordinate::new(0.0, 1.0),
            traffic_level,
            current_speed_kph: 30.0,
            freeflow_speed_kph: 80.0,
            color: traffic_level.color().to_owned(),
        }
    }

    fn replaced(change: RouteChange) -> RouteSignature {
        match change {
            RouteChange::Replaced(signature) => signature,
            other => panic!("expected a replaced route, got {other:?}"),
        }
    }

    #[test]
    fn signature_change_clears_all_derived_state() {
        let mut state = TripState::new();
        let first = replaced(
            state.set_stops(vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)]),
        );
        state.apply_geometry(
            &first,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
        );
        state.apply_traffic(&first, vec![segment(TrafficLevel::High)]);
        state.update_position(&VehicleFix::new(0.0, 0.5));
        assert!(state.geometry().is_some());
        assert!(state.progress().is_some());
        assert_eq!(state.traffic().len(), 1);

        state.set_stops(vec![stop("a", 0.0, 0.0), stop("c", 1.0, 1.0)]);
        assert!(state.geometry().is_none());
        assert!(state.progress().is_none());
        assert!(state.traffic().is_empty());
        assert!(state.remaining_path().is_empty());
    }

    #[test]
    fn stale_geometry_is_discarded_unconditionally() {
        let mut state = TripState::new();
        let old = replaced(
            state.set_stops(vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)]),
        );
        let new = replaced(
            state.set_stops(vec![stop("a", 0.0, 0.0), stop("c", 1.0, 1.0)]),
        );
        let fresh_points =
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        assert_eq!(
            state.apply_geometry(&new, fresh_points.clone()),
            Applied::Fresh
        );

        let outcome = state.apply_geometry(
            &old,
            vec![Coordinate::new(9.0, 9.0), Coordinate::new(9.0, 8.0)],
        );
        assert_eq!(outcome, Applied::Stale);
        assert_eq!(state.geometry().unwrap().points(), &fresh_points[..]);
    }

    #[test]
    fn shrinking_the_stop_list_invalidates_in_flight_results() {
        // three stops, then two: the three-stop fetch completes late and
        // must not leave a trace.
        let mut state = TripState::new();
        let three = replaced(state.set_stops(vec![
            stop("a", 0.0, 0.0),
            stop("b", 0.0, 1.0),
            stop("c", 0.0, 2.0),
        ]));
        let two = replaced(
            state.set_stops(vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)]),
        );
        assert_ne!(three, two);
        assert!(state.geometry().is_none());

        let late_three_stop_polyline = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 2.0),
        ];
        assert_eq!(
            state.apply_geometry(&three, late_three_stop_polyline),
            Applied::Stale
        );
        assert_eq!(
            state.apply_traffic(&three, vec![segment(TrafficLevel::High)]),
            Applied::Stale
        );
        assert!(state.geometry().is_none());
        assert!(state.traffic().is_empty());

        assert_eq!(
            state.apply_geometry(
                &two,
                vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
            ),
            Applied::Fresh
        );
        assert!(state.geometry().is_some());
    }

    #[test]
    fn fewer_than_two_stops_means_no_route() {
        let mut state = TripState::new();
        replaced(state.set_stops(vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)]));

        assert_eq!(
            state.set_stops(vec![stop("a", 0.0, 0.0)]),
            RouteChange::Cleared
        );
        assert!(state.signature().is_none());
        assert!(state.update_position(&VehicleFix::new(0.0, 0.5)).is_none());
    }

    #[test]
    fn arrival_updates_keep_the_route_and_its_artifacts() {
        let mut state = TripState::new();
        let signature = replaced(
            state.set_stops(vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)]),
        );
        state.apply_geometry(
            &signature,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
        );

        let mut updated = vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)];
        updated[0].arrival_time = Some(chrono::Local::now());
        assert_eq!(state.set_stops(updated), RouteChange::Unchanged);
        assert!(state.geometry().is_some());
    }

    #[test]
    fn traffic_is_filtered_and_replaced_not_appended() {
        let mut state = TripState::new();
        let signature = replaced(
            state.set_stops(vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)]),
        );

        state.apply_traffic(
            &signature,
            vec![segment(TrafficLevel::None), segment(TrafficLevel::High)],
        );
        assert_eq!(state.traffic().len(), 1);
        assert_eq!(state.traffic()[0].traffic_level, TrafficLevel::High);

        state.apply_traffic(&signature, vec![segment(TrafficLevel::Low)]);
        assert_eq!(state.traffic().len(), 1);
        assert_eq!(state.traffic()[0].traffic_level, TrafficLevel::Low);
    }

    #[test]
    fn teardown_clears_everything() {
        let mut state = TripState::new();
        let signature = replaced(
            state.set_stops(vec![stop("a", 0.0, 0.0), stop("b", 0.0, 1.0)]),
        );
        state.apply_geometry(
            &signature,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
        );
        state.update_position(&VehicleFix::new(0.0, 0.5));

        state.clear();
        assert!(state.stops().is_empty());
        assert!(state.signature().is_none());
        assert!(state.geometry().is_none());
        assert!(state.progress().is_none());
        assert!(state.traffic().is_empty());
    }
}

use itertools::Itertools;
use model::{
    coordinate::Coordinate,
    traffic::{TrafficLevel, TrafficSegment},
};

pub mod client;
pub mod mock;

pub use client::TomTomClient;
pub use mock::MockTrafficClient;

/// Expands a route level speed measurement into one colored segment per
/// consecutive waypoint pair, the granularity the overlay is drawn at.
pub(crate) fn expand_segments(
    waypoints: &[Coordinate],
    current_speed_kph: f64,
    freeflow_speed_kph: f64,
) -> Vec<TrafficSegment> {
    let ratio = if freeflow_speed_kph > 0.0 {
        current_speed_kph / freeflow_speed_kph
    } else {
        1.0
    };
    let level = TrafficLevel::from_speed_ratio(ratio);

    waypoints
        .iter()
        .tuple_windows()
        .map(|(start, end)| TrafficSegment {
            start: *start,
            end: *end,
            traffic_level: level,
            current_speed_kph,
            freeflow_speed_kph,
            color: level.color().to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_segment_per_consecutive_waypoint_pair() {
        let waypoints = vec![
            Coordinate::new(54.0, 10.0),
            Coordinate::new(54.1, 10.1),
            Coordinate::new(54.2, 10.2),
        ];
        let segments = expand_segments(&waypoints, 30.0, 80.0);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start, waypoints[0]);
        assert_eq!(segments[0].end, waypoints[1]);
        assert_eq!(segments[1].start, waypoints[1]);
        assert_eq!(segments[1].end, waypoints[2]);
        // 30 / 80 = 0.375, below the 0.4 threshold
        assert_eq!(segments[0].traffic_level, TrafficLevel::High);
        assert_eq!(segments[0].color, "#DC2626");
    }

    #[test]
    fn free_flow_is_scored_as_none() {
        let waypoints =
            vec![Coordinate::new(54.0, 10.0), Coordinate::new(54.1, 10.1)];
        let segments = expand_segments(&waypoints, 78.0, 80.0);
        assert_eq!(segments[0].traffic_level, TrafficLevel::None);
    }

    #[test]
    fn a_single_waypoint_has_no_segments() {
        assert!(expand_segments(&[Coordinate::new(54.0, 10.0)], 50.0, 80.0)
            .is_empty());
    }
}

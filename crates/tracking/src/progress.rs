use itertools::Itertools;
use model::{coordinate::Coordinate, fix::VehicleFix, progress::RouteProgress};
use utility::geo;

use crate::geometry::RouteGeometry;

/// Snaps a raw fix onto the route and derives traveled and remaining
/// distance.
///
/// A single forward pass over the segments tracks the best candidate
/// (distance to projection, segment index, projection, cumulative length
/// before the segment) alongside the running length. The best candidate
/// is replaced only on strict improvement, so of several equidistant
/// segments the earliest one wins.
pub fn compute_progress(
    geometry: &RouteGeometry,
    fix: &VehicleFix,
) -> Option<RouteProgress> {
    if !geometry.is_trackable() {
        return None;
    }
    let points = geometry.points();

    let mut best_distance = f64::INFINITY;
    let mut best_index = 0;
    let mut best_projection = points[0];
    let mut best_t = 0.0;
    let mut best_segment_length = 0.0;
    let mut length_before_best = 0.0;
    let mut running_length = 0.0;

    for (index, (start, end)) in points.iter().tuple_windows().enumerate() {
        let projection = geo::project_onto_segment(
            fix.latitude,
            fix.longitude,
            start.latitude,
            start.longitude,
            end.latitude,
            end.longitude,
        );
        let segment_length = start.distance_km(end);
        let distance = geo::haversine_km(
            fix.latitude,
            fix.longitude,
            projection.latitude,
            projection.longitude,
        );
        if distance < best_distance {
            best_distance = distance;
            best_index = index;
            best_projection =
                Coordinate::new(projection.latitude, projection.longitude);
            best_t = projection.t;
            best_segment_length = segment_length;
            length_before_best = running_length;
        }
        running_length += segment_length;
    }

    let distance_along_km = length_before_best + best_segment_length * best_t;
    let total = geometry.total_length_km();
    let remaining_km = (total - distance_along_km).max(0.0);
    let remaining_percent = if total > 0.0 {
        Some((remaining_km / total * 100.0).round().clamp(0.0, 100.0) as u8)
    } else {
        None
    };

    Some(RouteProgress {
        snapped_position: best_projection,
        segment_index: best_index,
        distance_along_km,
        remaining_km,
        remaining_percent,
    })
}

/// Forward part of the route for a progress overlay: the snapped position
/// followed by every polyline vertex strictly after the occupied segment.
pub fn remaining_path(
    geometry: &RouteGeometry,
    progress: &RouteProgress,
) -> Vec<Coordinate> {
    let mut path = vec![progress.snapped_position];
    path.extend_from_slice(&geometry.points()[progress.segment_index + 1..]);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equator_route() -> RouteGeometry {
        RouteGeometry::build(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
        ])
    }

    #[test]
    fn fix_halfway_along_the_equator_route() {
        let geometry = equator_route();
        let progress =
            compute_progress(&geometry, &VehicleFix::new(0.0, 0.5)).unwrap();

        assert_eq!(progress.segment_index, 0);
        assert!((progress.distance_along_km - 55.6).abs() < 0.1);
        assert!((progress.remaining_km - 55.6).abs() < 0.1);
        assert_eq!(progress.remaining_percent, Some(50));
    }

    #[test]
    fn off_route_fix_is_snapped_onto_the_polyline() {
        let geometry = equator_route();
        let progress =
            compute_progress(&geometry, &VehicleFix::new(0.1, 0.5)).unwrap();

        assert!((progress.snapped_position.latitude - 0.0).abs() < 1e-9);
        assert!((progress.snapped_position.longitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn along_plus_remaining_equals_total() {
        let geometry = RouteGeometry::build(vec![
            Coordinate::new(54.3233, 10.1228),
            Coordinate::new(54.1622, 10.4214),
            Coordinate::new(53.8655, 10.6866),
        ]);
        let progress =
            compute_progress(&geometry, &VehicleFix::new(54.2, 10.4)).unwrap();

        let sum = progress.distance_along_km + progress.remaining_km;
        assert!((sum - geometry.total_length_km()).abs() < 1e-9);
    }

    #[test]
    fn moving_forward_along_a_segment_increases_distance_along() {
        let geometry = RouteGeometry::build(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 2.0),
        ]);
        // same perpendicular offset, later t on the same segment
        let earlier =
            compute_progress(&geometry, &VehicleFix::new(0.1, 0.5)).unwrap();
        let later =
            compute_progress(&geometry, &VehicleFix::new(0.1, 0.8)).unwrap();

        assert_eq!(earlier.segment_index, later.segment_index);
        assert!(later.distance_along_km >= earlier.distance_along_km);
    }

    #[test]
    fn first_of_several_equidistant_segments_wins() {
        // route doubles back over itself, so the fix lies exactly on
        // segment 0 and segment 1.
        let geometry = RouteGeometry::build(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ]);
        let progress =
            compute_progress(&geometry, &VehicleFix::new(0.0, 0.5)).unwrap();

        assert_eq!(progress.segment_index, 0);
        assert!((progress.distance_along_km - 55.6).abs() < 0.1);
        assert_eq!(progress.remaining_percent, Some(75));
    }

    #[test]
    fn progress_at_the_destination_is_complete() {
        let geometry = equator_route();
        let progress =
            compute_progress(&geometry, &VehicleFix::new(0.0, 1.0)).unwrap();

        assert!((progress.remaining_km - 0.0).abs() < 1e-9);
        assert_eq!(progress.remaining_percent, Some(0));
    }

    #[test]
    fn untrackable_geometry_yields_no_progress() {
        let empty = RouteGeometry::build(vec![]);
        assert!(compute_progress(&empty, &VehicleFix::new(0.0, 0.0)).is_none());

        let single = RouteGeometry::build(vec![Coordinate::new(0.0, 0.0)]);
        assert!(compute_progress(&single, &VehicleFix::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn zero_length_route_has_no_percentage() {
        let geometry = RouteGeometry::build(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.0),
        ]);
        let progress =
            compute_progress(&geometry, &VehicleFix::new(0.0, 0.0)).unwrap();

        assert_eq!(progress.remaining_percent, None);
        assert_eq!(progress.remaining_km, 0.0);
    }

    #[test]
    fn remaining_path_starts_at_the_snapped_position() {
        let geometry = RouteGeometry::build(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 2.0),
            Coordinate::new(0.0, 3.0),
        ]);
        let progress =
            compute_progress(&geometry, &VehicleFix::new(0.0, 1.5)).unwrap();
        let path = remaining_path(&geometry, &progress);

        assert_eq!(progress.segment_index, 1);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], progress.snapped_position);
        assert_eq!(path[1], Coordinate::new(0.0, 2.0));
        assert_eq!(path[2], Coordinate::new(0.0, 3.0));
    }

    #[test]
    fn remaining_path_on_the_last_segment_only_adds_the_destination() {
        let geometry = equator_route();
        let progress =
            compute_progress(&geometry, &VehicleFix::new(0.0, 0.9)).unwrap();
        let path = remaining_path(&geometry, &progress);

        assert_eq!(path.len(), 2);
        assert_eq!(path[1], Coordinate::new(0.0, 1.0));
    }
}

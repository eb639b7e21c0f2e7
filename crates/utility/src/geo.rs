pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two latitude/longitude
/// pairs, using the haversine formulation on a mean-radius sphere.
pub fn haversine_km(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = latitude_1.to_radians();
    let lat2_rad = latitude_2.to_radians();

    let dlat = (latitude_2 - latitude_1).to_radians();
    let dlon = (longitude_2 - longitude_1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial bearing from the first to the second point, in degrees
/// normalized to [0, 360).
pub fn bearing_deg(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = latitude_1.to_radians();
    let lat2_rad = latitude_2.to_radians();
    let dlon = (longitude_2 - longitude_1).to_radians();

    let y = dlon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin()
        - lat1_rad.sin() * lat2_rad.cos() * dlon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub latitude: f64,
    pub longitude: f64,
    /// Projection parameter along the segment. Clamped to [0, 1], so the
    /// projected point never leaves the finite segment.
    pub t: f64,
}

/// Closest point on the finite segment from `(start_latitude, start_longitude)`
/// to `(end_latitude, end_longitude)`, treating latitude/longitude as a local
/// plane.
pub fn project_onto_segment(
    latitude: f64,
    longitude: f64,
    start_latitude: f64,
    start_longitude: f64,
    end_latitude: f64,
    end_longitude: f64,
) -> SegmentProjection {
    let dlat = end_latitude - start_latitude;
    let dlon = end_longitude - start_longitude;

    let squared_length = dlat * dlat + dlon * dlon;
    if squared_length == 0.0 {
        // degenerate segment, both endpoints coincide
        return SegmentProjection {
            latitude: start_latitude,
            longitude: start_longitude,
            t: 0.0,
        };
    }

    let t = ((latitude - start_latitude) * dlat
        + (longitude - start_longitude) * dlon)
        / squared_length;
    let t = t.clamp(0.0, 1.0);

    SegmentProjection {
        latitude: start_latitude + t * dlat,
        longitude: start_longitude + t * dlon,
        t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert_eq!(haversine_km(54.3233, 10.1228, 54.3233, 10.1228), 0.0);
    }

    #[test]
    fn haversine_is_symmetric() {
        let there = haversine_km(54.3233, 10.1228, 53.5511, 9.9937);
        let back = haversine_km(53.5511, 9.9937, 54.3233, 10.1228);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn haversine_kiel_to_hamburg() {
        // Kiel Hbf to Hamburg Hbf is roughly 86 km as the crow flies.
        let distance = haversine_km(54.3233, 10.1228, 53.5511, 9.9937);
        assert!((distance - 86.0).abs() < 2.0, "got {distance}");
    }

    #[test]
    fn haversine_one_degree_of_longitude_at_equator() {
        let distance = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 111.195).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn projection_hits_endpoints_at_t_0_and_1() {
        let at_start = project_onto_segment(0.0, -1.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(at_start.t, 0.0);
        assert_eq!((at_start.latitude, at_start.longitude), (0.0, 0.0));

        let at_end = project_onto_segment(0.0, 2.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(at_end.t, 1.0);
        assert_eq!((at_end.latitude, at_end.longitude), (0.0, 1.0));
    }

    #[test]
    fn projection_clamps_t_to_unit_interval() {
        for longitude in [-10.0, -0.5, 0.0, 0.25, 0.99, 1.5, 20.0] {
            let projection =
                project_onto_segment(0.5, longitude, 0.0, 0.0, 0.0, 1.0);
            assert!((0.0..=1.0).contains(&projection.t));
        }
    }

    #[test]
    fn projection_drops_perpendicular_onto_segment() {
        let projection = project_onto_segment(1.0, 0.5, 0.0, 0.0, 0.0, 1.0);
        assert!((projection.t - 0.5).abs() < 1e-9);
        assert!((projection.latitude - 0.0).abs() < 1e-9);
        assert!((projection.longitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn projection_of_degenerate_segment_is_the_point_itself() {
        let projection = project_onto_segment(1.0, 1.0, 2.0, 2.0, 2.0, 2.0);
        assert_eq!(projection.t, 0.0);
        assert_eq!((projection.latitude, projection.longitude), (2.0, 2.0));
    }

    #[test]
    fn bearing_east_along_equator() {
        let bearing = bearing_deg(0.0, 0.0, 0.0, 1.0);
        assert!((bearing - 90.0).abs() < 1e-6);
    }

    #[test]
    fn bearing_is_normalized() {
        let bearing = bearing_deg(0.0, 1.0, 0.0, 0.0);
        assert!((0.0..360.0).contains(&bearing));
        assert!((bearing - 270.0).abs() < 1e-6);
    }
}

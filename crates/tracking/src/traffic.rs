use model::traffic::TrafficSegment;

/// Keeps only the segments a consumer should draw: everything scored
/// above `none`, in provider order.
pub fn active_segments(segments: Vec<TrafficSegment>) -> Vec<TrafficSegment> {
    segments
        .into_iter()
        .filter(|segment| !segment.traffic_level.is_none())
        .collect()
}

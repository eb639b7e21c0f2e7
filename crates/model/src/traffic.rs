use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    None,
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    /// Congestion level derived from the ratio of live speed to freeflow
    /// speed along a route section.
    pub fn from_speed_ratio(ratio: f64) -> Self {
        if ratio >= 0.9 {
            TrafficLevel::None
        } else if ratio >= 0.7 {
            TrafficLevel::Low
        } else if ratio >= 0.4 {
            TrafficLevel::Medium
        } else {
            TrafficLevel::High
        }
    }

    /// Overlay color used by map consumers for this level.
    pub fn color(&self) -> &'static str {
        match self {
            TrafficLevel::None => "#10B981",
            TrafficLevel::Low => "#FBBF24",
            TrafficLevel::Medium => "#F59E0B",
            TrafficLevel::High => "#DC2626",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TrafficLevel::None)
    }
}

/// Scored sub-span of the active route, as reported by the traffic
/// provider. Segments with level `none` are valid provider output; the
/// aggregator filters them before exposure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSegment {
    pub start: Coordinate,
    pub end: Coordinate,
    pub traffic_level: TrafficLevel,
    pub current_speed_kph: f64,
    pub freeflow_speed_kph: f64,
    pub color: String,
}

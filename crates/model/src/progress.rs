use schemars::JsonSchema;
use serde::Serialize;

use crate::coordinate::Coordinate;

/// Where the vehicle is along the active route. Derived from a single
/// vehicle fix against the current route geometry; recomputed whenever
/// either of the two changes and never carried across route changes.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteProgress {
    /// The raw fix snapped onto the route polyline.
    pub snapped_position: Coordinate,
    /// Index of the polyline segment the vehicle currently occupies.
    pub segment_index: usize,
    pub distance_along_km: f64,
    pub remaining_km: f64,
    /// None when the route has no length to measure against.
    pub remaining_percent: Option<u8>,
}

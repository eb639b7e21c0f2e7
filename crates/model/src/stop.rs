use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::coordinate::Coordinate;

/// Ordered waypoint of a planned route. Stops are supplied by the trip
/// source and only ever read by the tracking engine.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: Id<Stop>,
    pub name: Option<String>,
    pub sequence: i32,
    pub location: Coordinate,
    /// Set once the vehicle has actually arrived. A stop with an arrival
    /// time counts as completed.
    pub arrival_time: Option<DateTime<Local>>,
    /// Estimated remaining travel time to this stop in seconds.
    pub eta_seconds: Option<i64>,
}

impl HasId for Stop {
    type IdType = String;
}

impl Stop {
    pub fn is_completed(&self) -> bool {
        self.arrival_time.is_some()
    }
}

/// First stop the vehicle has not arrived at yet, in list order.
pub fn next_open_stop(stops: &[Stop]) -> Option<&Stop> {
    stops.iter().find(|stop| !stop.is_completed())
}

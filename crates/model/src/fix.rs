use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Raw GPS sample for the tracked vehicle. A fix is a momentary input to
/// the engine and is not stored beyond the computation it triggers.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFix {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kph: Option<f64>,
    pub timestamp: Option<DateTime<Local>>,
}

impl VehicleFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            speed_kph: None,
            timestamp: None,
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

use async_trait::async_trait;
use chrono::{Local, Timelike};
use model::{coordinate::Coordinate, traffic::TrafficSegment};
use tracking::provider::{ProviderError, TrafficProvider};

use crate::expand_segments;

const FREEFLOW_SPEED_KPH: f64 = 80.0;

/// Keyless stand-in for the traffic provider, for development and the
/// playground. Congestion follows the time of day: rush hour crawls,
/// nights flow freely.
pub struct MockTrafficClient;

impl MockTrafficClient {
    fn speed_ratio_at(hour: u32) -> f64 {
        match hour {
            7..=9 | 17..=19 => 0.6,
            22.. | ..=5 => 0.95,
            _ => 0.8,
        }
    }
}

#[async_trait]
impl TrafficProvider for MockTrafficClient {
    async fn fetch_traffic(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<TrafficSegment>, ProviderError> {
        let ratio = Self::speed_ratio_at(Local::now().hour());
        Ok(expand_segments(
            waypoints,
            FREEFLOW_SPEED_KPH * ratio,
            FREEFLOW_SPEED_KPH,
        ))
    }
}

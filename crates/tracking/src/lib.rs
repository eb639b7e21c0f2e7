use std::{error, fmt};

pub mod geometry;
pub mod monitor;
pub mod progress;
pub mod provider;
pub mod signature;
pub mod state;
pub mod traffic;

use provider::ProviderError;

#[derive(Debug, Clone)]
pub enum TrackingError {
    /// A route needs at least an origin and a destination.
    NotEnoughStops(usize),
    Provider(ProviderError),
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackingError::NotEnoughStops(count) => {
                write!(f, "a route requires at least 2 stops, got {count}")
            }
            TrackingError::Provider(why) => write!(f, "provider error: {why}"),
        }
    }
}

impl error::Error for TrackingError {}

impl From<ProviderError> for TrackingError {
    fn from(why: ProviderError) -> Self {
        TrackingError::Provider(why)
    }
}

pub type TrackingResult<O> = Result<O, TrackingError>;

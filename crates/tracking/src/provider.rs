use std::{error, fmt, sync::Arc};

use async_trait::async_trait;
use model::{coordinate::Coordinate, traffic::TrafficSegment};

/// Failure of an external route or traffic collaborator. Never fatal to
/// the engine: geometry failures leave the store empty, traffic failures
/// degrade to an empty overlay.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// The provider answered, but without a usable route.
    NoRoute,
    /// Transport level failure (connect, timeout, dns, ...).
    Transport(Arc<dyn error::Error + Send + Sync>),
    /// The provider answered with a payload we can not interpret.
    InvalidPayload(String),
    /// The provider is not configured (e.g. missing API key).
    NotConfigured(String),
}

impl ProviderError {
    pub fn transport<E>(why: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        Self::Transport(Arc::new(why))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProviderError::NoRoute => write!(f, "no route found"),
            ProviderError::Transport(why) => write!(f, "transport error: {why}"),
            ProviderError::InvalidPayload(why) => {
                write!(f, "invalid payload: {why}")
            }
            ProviderError::NotConfigured(what) => {
                write!(f, "provider not configured: {what}")
            }
        }
    }
}

impl error::Error for ProviderError {}

/// External routing collaborator: turns an ordered waypoint list into the
/// primary route as an ordered, dense polyline. Only the first candidate
/// a provider offers is ever consumed.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn fetch_route(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<Coordinate>, ProviderError>;
}

/// External traffic collaborator: returns scored segments along the given
/// waypoints. Segments with level `none` are valid output here; filtering
/// them is the consumer's job, not the provider's.
#[async_trait]
pub trait TrafficProvider: Send + Sync {
    async fn fetch_traffic(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<TrafficSegment>, ProviderError>;
}

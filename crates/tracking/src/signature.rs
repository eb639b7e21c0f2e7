use std::fmt;

use itertools::Itertools;
use model::stop::Stop;
use schemars::JsonSchema;
use serde::Serialize;
use utility::id::Key;

use crate::{TrackingError, TrackingResult};

/// Decimal places coordinates are rounded to before they enter the
/// signature. Five decimals is roughly 1.1 m, coarse enough to swallow
/// floating point noise between otherwise identical stop lists. Tunable,
/// not a law.
pub const SIGNATURE_PRECISION: usize = 5;

/// Fingerprint of an ordered stop list.
///
/// Every asynchronous route or traffic fetch is keyed by the signature it
/// was started for; a completion whose signature no longer matches the
/// current one is discarded whole. This gate is the only thing keeping a
/// slow, stale response from clobbering a newer route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub struct RouteSignature(String);

impl RouteSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives the signature for an ordered stop list from the (id, latitude,
/// longitude) triples. Any change in order, count or rounded coordinate
/// yields a different signature; anything else (names, ETAs, arrival
/// times) does not.
pub fn compute_signature(stops: &[Stop]) -> TrackingResult<RouteSignature> {
    if stops.len() < 2 {
        return Err(TrackingError::NotEnoughStops(stops.len()));
    }
    let key = stops
        .iter()
        .map(|stop| {
            format!(
                "{}:{:.precision$}:{:.precision$}",
                stop.id.string_key(),
                stop.location.latitude,
                stop.location.longitude,
                precision = SIGNATURE_PRECISION,
            )
        })
        .join("|");
    Ok(RouteSignature(key))
}

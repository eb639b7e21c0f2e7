use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use model::{
    coordinate::Coordinate, fix::VehicleFix, progress::RouteProgress,
    stop::Stop, traffic::TrafficSegment,
};
use schemars::JsonSchema;
use serde::Serialize;
use tracking::signature::RouteSignature;
use utility::let_also::LetAlso;

use crate::{
    common::{bad_request, schema},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_trip).put(set_stops).delete(teardown))
        .route("/position", post(update_position))
        .route("/refresh", post(refresh))
        .route("/progress", get(get_progress))
        .route("/progress/schema", get(schema::<RouteProgress>))
        .route("/traffic", get(get_traffic))
        .route("/traffic/schema", get(schema::<TrafficSegment>))
        .route("/route", get(get_route))
        .route("/remaining-path", get(get_remaining_path))
        .with_state(state)
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct TripResponse {
    /// None when the submitted list does not form a route.
    signature: Option<RouteSignature>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct TripStatus {
    signature: Option<RouteSignature>,
    stops: Vec<Stop>,
    /// First stop without an arrival time, the current leg's destination.
    next_stop: Option<Stop>,
    progress: Option<RouteProgress>,
}

async fn get_trip(
    State(WebState { monitor }): State<WebState>,
) -> Json<TripStatus> {
    let stops = monitor.stops().await;
    let next_stop = model::stop::next_open_stop(&stops).cloned();
    Json(TripStatus {
        signature: monitor.signature().await,
        next_stop,
        progress: monitor.progress().await,
        stops,
    })
}

/// Replaces the planned route with the submitted stop list. Geometry and
/// traffic are refreshed for the new signature before the request
/// answers; a list with fewer than two stops clears the route.
async fn set_stops(
    State(WebState { monitor }): State<WebState>,
    Json(stops): Json<Vec<Stop>>,
) -> Result<Json<TripResponse>, Response> {
    if let Some(stop) = stops.iter().find(|stop| !stop.location.is_in_bounds())
    {
        return Err(bad_request(format!(
            "stop '{}' is outside the coordinate bounds",
            stop.id
        )));
    }

    let signature = monitor.set_stops(stops).await;
    Ok(Json(TripResponse { signature }))
}

/// Feeds a raw GPS fix through the engine. Answers with the derived
/// progress, or null while no route geometry is available.
async fn update_position(
    State(WebState { monitor }): State<WebState>,
    Json(fix): Json<VehicleFix>,
) -> Result<Json<Option<RouteProgress>>, Response> {
    if !fix.location().is_in_bounds() {
        return Err(bad_request("fix is outside the coordinate bounds"));
    }

    monitor
        .update_position(fix)
        .await
        .let_owned(|progress| Ok(Json(progress)))
}

/// Re-fetches geometry and traffic for the current route, e.g. from a
/// periodic traffic poll.
async fn refresh(State(WebState { monitor }): State<WebState>) -> StatusCode {
    monitor.refresh().await;
    StatusCode::NO_CONTENT
}

async fn get_progress(
    State(WebState { monitor }): State<WebState>,
) -> Json<Option<RouteProgress>> {
    monitor.progress().await.let_owned(Json)
}

async fn get_traffic(
    State(WebState { monitor }): State<WebState>,
) -> Json<Vec<TrafficSegment>> {
    monitor.traffic().await.let_owned(Json)
}

async fn get_route(
    State(WebState { monitor }): State<WebState>,
) -> Json<Vec<Coordinate>> {
    monitor.route_polyline().await.let_owned(Json)
}

async fn get_remaining_path(
    State(WebState { monitor }): State<WebState>,
) -> Json<Vec<Coordinate>> {
    monitor.remaining_path().await.let_owned(Json)
}

/// Route view closed: every derived artifact is dropped so nothing stale
/// can be drawn later.
async fn teardown(State(WebState { monitor }): State<WebState>) -> StatusCode {
    monitor.teardown().await;
    StatusCode::NO_CONTENT
}

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

pub mod v1;

use crate::{common::route_not_found, WebState};

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .nest_service("/v1", v1::routes(state))
        .fallback(route_not_found)
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}

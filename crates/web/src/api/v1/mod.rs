use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

mod trip;

use crate::{common::route_not_found, WebState};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest_service("/trip", trip::routes(state))
        .fallback(route_not_found)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok"
    }))
}

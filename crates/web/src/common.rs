use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::{schema_for, JsonSchema};
use serde::Serialize;
use serde_json::json;

/// Error envelope for everything that goes wrong at the API boundary.
/// Engine degradation (no route, no traffic) is not an error and answers
/// with nulls and empty lists instead.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

pub fn bad_request<S: Into<String>>(message: S) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

pub async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: "route not found".to_owned(),
        }),
    )
        .into_response()
}

/// JSON schema of a response type, so consumers can generate bindings.
pub async fn schema<T: JsonSchema>() -> Json<serde_json::Value> {
    Json(serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({})))
}

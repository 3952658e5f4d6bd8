use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use mediashelf_infra::StoreError;

/// Message returned when a change could not be made durable.
pub const STORAGE_UNAVAILABLE: &str = "storage unavailable";

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match &err {
        StoreError::Validation(e) => json_error(StatusCode::BAD_REQUEST, e.to_string()),
        StoreError::Persistence(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_UNAVAILABLE),
        StoreError::IdsExhausted => json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

pub fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

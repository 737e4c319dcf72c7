use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub mod blogs;
pub mod login;
pub mod testing;
pub mod users;

pub async fn unknown_endpoint() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown endpoint" })))
}

/// Response envelope shared by every endpoint.
///
/// Success and failure both serialize as
/// `{status, message, statusCode, timestamp, data?|errors?}` so clients can
/// handle all outcomes uniformly.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    let body = ApiResponse {
        status: "success",
        message: message.to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now(),
        data: Some(data),
        errors: None,
    };
    (status, Json(body)).into_response()
}

pub fn success_message(status: StatusCode, message: &str) -> Response {
    let body = ApiResponse::<()> {
        status: "success",
        message: message.to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now(),
        data: None,
        errors: None,
    };
    (status, Json(body)).into_response()
}

pub fn error(status: StatusCode, message: &str, errors: Option<serde_json::Value>) -> Response {
    let body = ApiResponse::<()> {
        status: "error",
        message: message.to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now(),
        data: None,
        errors,
    };
    (status, Json(body)).into_response()
}

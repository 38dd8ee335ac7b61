use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("User with this email already exists")]
    DuplicateEmail,

    /// Unknown email and wrong password collapse into this variant so the
    /// caller cannot enumerate registered accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated. Please contact support.")]
    AccountDeactivated,

    /// Covers bad signature, expiry, revocation and unknown tokens alike;
    /// callers must not learn which one occurred.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Access denied. No token provided.")]
    Unauthorized,

    #[error("Access denied. Insufficient permissions.")]
    Forbidden,

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: u64 },

    #[error("Database error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Validation(_) | AuthError::DuplicateEmail | AuthError::EmailTaken => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidCredentials
            | AuthError::AccountDeactivated
            | AuthError::InvalidRefreshToken
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Store(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal detail stays in the logs; the caller only sees a generic
        // message. Everything else is safe to surface verbatim.
        let (message, errors) = match &self {
            AuthError::Store(detail) | AuthError::Internal(detail) => {
                tracing::error!(%detail, "request failed with internal error");
                ("Internal server error".to_string(), None)
            }
            AuthError::Validation(e) => (self.to_string(), Some(validation_errors_json(e))),
            other => (other.to_string(), None),
        };

        let mut res = response::error(status, &message, errors);
        if let AuthError::RateLimited { retry_after } = &self {
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                res.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        res
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Store(err.to_string())
    }
}

fn validation_errors_json(errors: &ValidationErrors) -> serde_json::Value {
    let items: Vec<serde_json::Value> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                json!({ "field": field, "message": message })
            })
        })
        .collect();
    json!(items)
}

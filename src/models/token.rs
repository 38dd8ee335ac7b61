/// Refresh credential record and token response shapes
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::UserProfile;

/// One live refresh credential. An account holds at most a fixed number of
/// these; inserting beyond the cap evicts the oldest. Records past their TTL
/// are treated as absent at read time even before the sweep removes them.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
    pub refresh_token_expires_in: i64,
}

/// Returned by signup and signin: the public account projection plus both
/// tokens.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSession {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// Returned by refresh: a new access token only. The refresh credential is
/// deliberately not rotated.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenData {
    pub access_token: String,
    pub access_token_expires_in: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Signout body. Without a token the request signs the account out of every
/// device.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignoutRequest {
    pub refresh_token: Option<String>,
}

/// Bearer-token authentication extractors
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AuthError;
use crate::models::{Role, UserProfile};
use crate::AppState;

/// The account behind the request, resolved from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserProfile);

/// Like [`AuthUser`] but additionally requires the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserProfile);

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;
    header.strip_prefix("Bearer ").ok_or(AuthError::Unauthorized)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state.sessions.authenticate(token).await?;
        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state.sessions.authenticate(token).await?;
        require_role(&user, Role::Admin)?;
        Ok(AdminUser(user))
    }
}

/// Role guard shared by the extractors and ad hoc checks in handlers.
pub fn require_role(user: &UserProfile, role: Role) -> Result<(), AuthError> {
    if user.role == role {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Authentication handlers
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::Response,
    Json,
};
use validator::Validate;

use crate::{
    error::AuthError,
    middleware::AuthUser,
    models::{
        AccessTokenData, AuthSession, ChangePasswordRequest, RefreshTokenRequest, SigninRequest,
        SignoutRequest, SignupRequest, UpdateProfileRequest, UserProfile,
    },
    response, AppState,
};

/// Register endpoint handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = AuthSession),
        (status = 400, description = "Validation failed or email already registered"),
        (status = 429, description = "Too many signups from this address")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<SignupRequest>,
) -> Result<Response, AuthError> {
    state.rate_limiter.check_signup(addr.ip())?;
    payload.validate()?;

    let session = state
        .sessions
        .signup(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok(response::success(
        StatusCode::CREATED,
        "User registered successfully",
        session,
    ))
}

/// Signin endpoint handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "Auth",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "User signed in", body = AuthSession),
        (status = 401, description = "Invalid credentials or deactivated account"),
        (status = 429, description = "Too many attempts from this address")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<SigninRequest>,
) -> Result<Response, AuthError> {
    state.rate_limiter.check_signin(addr.ip())?;
    payload.validate()?;

    let session = state
        .sessions
        .signin(&payload.email, &payload.password)
        .await?;

    // Only failed attempts count against the window.
    state.rate_limiter.record_signin_success(addr.ip());

    Ok(response::success(
        StatusCode::OK,
        "User signed in successfully",
        session,
    ))
}

/// Refresh endpoint handler. Public: the refresh token itself is the
/// credential.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    tag = "Auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Access token refreshed", body = AccessTokenData),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Response, AuthError> {
    payload.validate()?;

    let data = state.sessions.refresh(&payload.refresh_token).await?;

    Ok(response::success(
        StatusCode::OK,
        "Access token refreshed successfully",
        data,
    ))
}

/// Signout endpoint handler. With a refresh token in the body only that
/// device session is revoked; without one, all of them.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signout",
    tag = "Auth",
    request_body = SignoutRequest,
    responses(
        (status = 200, description = "User signed out"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn signout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Option<Json<SignoutRequest>>,
) -> Result<Response, AuthError> {
    let token = body.and_then(|Json(b)| b.refresh_token);
    state.sessions.signout(user.id, token.as_deref()).await?;

    Ok(response::success_message(
        StatusCode::OK,
        "User signed out successfully",
    ))
}

/// Signout-all endpoint handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/signout-all",
    tag = "Auth",
    responses(
        (status = 200, description = "All device sessions revoked"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn signout_all(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AuthError> {
    state.sessions.signout_all(user.id).await?;

    Ok(response::success_message(
        StatusCode::OK,
        "User signed out from all devices successfully",
    ))
}

/// Current session identity lookup
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AuthError> {
    let profile = state.sessions.get_me(user.id).await?;

    Ok(response::success(
        StatusCode::OK,
        "User data retrieved successfully",
        profile,
    ))
}

/// Profile update endpoint handler
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    tag = "Auth",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Validation failed or email already exists"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Response, AuthError> {
    payload.validate()?;

    let profile = state
        .sessions
        .update_profile(user.id, payload.name.as_deref(), payload.email.as_deref())
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Profile updated successfully",
        profile,
    ))
}

/// Change password endpoint handler
#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed, all sessions revoked"),
        (status = 401, description = "Current password incorrect or unauthorized"),
        (status = 429, description = "Too many attempts from this address")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Response, AuthError> {
    state.rate_limiter.check_sensitive(addr.ip())?;
    payload.validate()?;

    state
        .sessions
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(response::success_message(
        StatusCode::OK,
        "Password changed successfully. Please sign in again.",
    ))
}

/// Deactivate endpoint handler
#[utoipa::path(
    put,
    path = "/api/v1/auth/deactivate",
    tag = "Auth",
    responses(
        (status = 200, description = "Account deactivated"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn deactivate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AuthError> {
    state.sessions.deactivate(user.id).await?;

    Ok(response::success_message(
        StatusCode::OK,
        "Account deactivated successfully",
    ))
}

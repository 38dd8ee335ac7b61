use utoipa::OpenApi;

use crate::models::{
    AccessTokenData, AuthSession, ChangePasswordRequest, RefreshTokenRequest, Role,
    SigninRequest, SignoutRequest, SignupRequest, TokenPair, UpdateProfileRequest, UserProfile,
};

/// OpenAPI document covering the REST endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::signup,
        crate::handlers::auth::signin,
        crate::handlers::auth::refresh_token,
        crate::handlers::auth::signout,
        crate::handlers::auth::signout_all,
        crate::handlers::auth::me,
        crate::handlers::auth::update_profile,
        crate::handlers::auth::change_password,
        crate::handlers::auth::deactivate
    ),
    components(schemas(
        SignupRequest,
        SigninRequest,
        RefreshTokenRequest,
        SignoutRequest,
        ChangePasswordRequest,
        UpdateProfileRequest,
        AuthSession,
        TokenPair,
        AccessTokenData,
        UserProfile,
        Role
    )),
    tags(
        (name = "Auth", description = "Credential lifecycle APIs")
    )
)]
pub struct ApiDoc;

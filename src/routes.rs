/// Route definitions
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handlers, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        // Public endpoints
        .route("/api/v1/auth/signup", post(handlers::signup))
        .route("/api/v1/auth/signin", post(handlers::signin))
        .route("/api/v1/auth/refresh-token", post(handlers::refresh_token))
        // Authenticated endpoints
        .route("/api/v1/auth/signout", post(handlers::signout))
        .route("/api/v1/auth/signout-all", post(handlers::signout_all))
        .route("/api/v1/auth/me", get(handlers::me))
        .route("/api/v1/auth/profile", put(handlers::update_profile))
        .route(
            "/api/v1/auth/change-password",
            put(handlers::change_password),
        )
        .route("/api/v1/auth/deactivate", put(handlers::deactivate))
        // Health checks
        .route("/health", get(health_check))
        .route("/readiness", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn readiness_check() -> &'static str {
    "READY"
}

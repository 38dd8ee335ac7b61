//! authgate — credential lifecycle service
//!
//! Issues, validates and revokes session credentials for a multi-device
//! client population: signed access/refresh token pairs, a capped list of
//! refresh credentials per account, and forced revocation on password change
//! or deactivation.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod security;
pub mod services;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{AuthError, Result};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<services::SessionService>,
    pub rate_limiter: Arc<rate_limit::RateLimiter>,
}

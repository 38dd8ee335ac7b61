/// Request authentication and authorization middleware
pub mod auth;

pub use auth::{require_role, AdminUser, AuthUser};

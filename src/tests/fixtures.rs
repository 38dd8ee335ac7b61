/// Test fixtures and helpers
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{AuthSession, Role, User, UserProfile};
use crate::security::JwtKeys;
use crate::services::SessionService;
use crate::store::MemoryStore;

pub const TEST_NAME: &str = "Test User";
pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_EMAIL_2: &str = "other@example.com";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Minimum bcrypt cost keeps the suite fast; production uses the configured
/// factor.
pub const TEST_COST: u32 = 4;

pub fn test_keys() -> JwtKeys {
    JwtKeys::new(
        "access-secret-for-tests",
        "refresh-secret-for-tests",
        Duration::minutes(15),
        Duration::days(7),
    )
}

/// Negative TTLs mint tokens that are already expired.
pub fn expired_keys() -> JwtKeys {
    JwtKeys::new(
        "access-secret-for-tests",
        "refresh-secret-for-tests",
        Duration::seconds(-120),
        Duration::seconds(-120),
    )
}

pub fn test_service() -> (Arc<MemoryStore>, SessionService) {
    let store = Arc::new(MemoryStore::new());
    let service = SessionService::new(store.clone(), test_keys(), TEST_COST, 5);
    (store, service)
}

pub async fn signed_up(service: &SessionService) -> AuthSession {
    service
        .signup(TEST_NAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("signup should succeed")
}

pub fn test_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: TEST_NAME.to_string(),
        email: TEST_EMAIL.to_string(),
        password_hash: String::new(),
        role: Role::User,
        is_active: true,
        email_verified: false,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_profile(role: Role) -> UserProfile {
    let mut user = test_user();
    user.role = role;
    user.into()
}

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "postgres://unused".to_string(),
        jwt_access_secret: "access-secret-for-tests".to_string(),
        jwt_refresh_secret: "refresh-secret-for-tests".to_string(),
        access_token_ttl_secs: 900,
        refresh_token_ttl_secs: 604_800,
        bcrypt_cost: TEST_COST,
        refresh_token_cap: 5,
        signup_limit_per_hour: 3,
        signin_limit_per_window: 5,
        signin_window_secs: 900,
        sensitive_limit_per_hour: 3,
    }
}

/// Email formats that the validator actually rejects.
pub fn invalid_emails() -> Vec<&'static str> {
    vec![
        "not-an-email",
        "@example.com",
        "test@",
        "test @example.com",
    ]
}

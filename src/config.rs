/// Configuration management
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
    pub database_url: String,

    /// Signing key for access tokens. Must differ from the refresh key so a
    /// compromise of one class cannot forge the other.
    pub jwt_access_secret: String,
    /// Signing key for refresh tokens.
    pub jwt_refresh_secret: String,

    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,

    /// bcrypt work factor. 12 keeps a single verification around 100ms on
    /// commodity hardware.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Maximum live refresh credentials per account (oldest evicted beyond).
    #[serde(default = "default_refresh_cap")]
    pub refresh_token_cap: usize,

    #[serde(default = "default_signup_limit")]
    pub signup_limit_per_hour: u32,
    #[serde(default = "default_signin_limit")]
    pub signin_limit_per_window: u32,
    #[serde(default = "default_signin_window")]
    pub signin_window_secs: u64,
    #[serde(default = "default_sensitive_limit")]
    pub sensitive_limit_per_hour: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_access_ttl() -> i64 {
    900 // 15 minutes
}

fn default_refresh_ttl() -> i64 {
    604_800 // 7 days
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_refresh_cap() -> usize {
    5
}

fn default_signup_limit() -> u32 {
    3
}

fn default_signin_limit() -> u32 {
    5
}

fn default_signin_window() -> u64 {
    900
}

fn default_sensitive_limit() -> u32 {
    3
}

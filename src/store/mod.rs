/// Credential store: the abstract keyed store behind the session service.
///
/// Two implementations ship with the crate: [`PgStore`] for deployments and
/// [`MemoryStore`] for tests and single-node setups. Uniqueness of emails is
/// enforced at the store level; the session service's pre-check is only a
/// fast path.
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Insert a new account. An email collision must surface as
    /// `DuplicateEmail`, backed by the store's uniqueness guarantee — the
    /// authoritative signal under concurrent signups.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn update_last_login(&self, id: Uuid) -> Result<()>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;

    /// Apply a partial profile update. Changing the email clears the
    /// verified flag; a collision with another account surfaces as
    /// `EmailTaken`.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<()>;

    /// Insert a refresh credential, evicting the oldest records beyond
    /// `cap` (FIFO).
    async fn push_refresh_token(&self, user_id: Uuid, token: &str, cap: usize) -> Result<()>;

    /// Exact-match lookup of a live credential. Records older than `ttl`
    /// count as absent whether or not they have been swept.
    async fn refresh_token_exists(&self, user_id: Uuid, token: &str, ttl: Duration)
        -> Result<bool>;

    /// Remove one credential. Removing a non-existent record is not an error.
    async fn remove_refresh_token(&self, user_id: Uuid, token: &str) -> Result<()>;

    async fn remove_all_refresh_tokens(&self, user_id: Uuid) -> Result<()>;

    async fn count_refresh_tokens(&self, user_id: Uuid) -> Result<usize>;

    /// Drop records past their TTL. Returns how many were removed.
    async fn purge_expired_tokens(&self, ttl: Duration) -> Result<u64>;
}

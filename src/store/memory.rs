/// In-memory credential store.
///
/// Backs the test suite and is usable as-is for single-node deployments that
/// can afford to lose sessions on restart. Uniqueness and FIFO eviction match
/// the Postgres implementation.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::models::{NewUser, RefreshTokenRecord, User};
use crate::store::AuthStore;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tokens: RwLock<HashMap<Uuid, Vec<RefreshTokenRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn mark_email_verified(&self, id: Uuid) {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.email_verified = true;
        }
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            email_verified: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_last_login(&self, id: Uuid) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            let now = Utc::now();
            user.last_login_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User> {
        let mut users = self.users.write().await;
        if let Some(email) = email {
            if users.values().any(|u| u.id != id && u.email == email) {
                return Err(AuthError::EmailTaken);
            }
        }
        let user = users.get_mut(&id).ok_or(AuthError::Unauthorized)?;
        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(email) = email {
            if email != user.email {
                user.email = email.to_string();
                user.email_verified = false;
            }
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.is_active = active;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn push_refresh_token(&self, user_id: Uuid, token: &str, cap: usize) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        let records = tokens.entry(user_id).or_default();
        records.push(RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id,
            token: token.to_string(),
            created_at: Utc::now(),
        });
        // Records are insertion-ordered, so eviction drops from the front.
        let overflow = records.len().saturating_sub(cap);
        records.drain(..overflow);
        Ok(())
    }

    async fn refresh_token_exists(
        &self,
        user_id: Uuid,
        token: &str,
        ttl: Duration,
    ) -> Result<bool> {
        let cutoff = Utc::now() - ttl;
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(&user_id)
            .map(|records| {
                records
                    .iter()
                    .any(|r| r.token == token && r.created_at > cutoff)
            })
            .unwrap_or(false))
    }

    async fn remove_refresh_token(&self, user_id: Uuid, token: &str) -> Result<()> {
        if let Some(records) = self.tokens.write().await.get_mut(&user_id) {
            records.retain(|r| r.token != token);
        }
        Ok(())
    }

    async fn remove_all_refresh_tokens(&self, user_id: Uuid) -> Result<()> {
        self.tokens.write().await.remove(&user_id);
        Ok(())
    }

    async fn count_refresh_tokens(&self, user_id: Uuid) -> Result<usize> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(&user_id).map(Vec::len).unwrap_or(0))
    }

    async fn purge_expired_tokens(&self, ttl: Duration) -> Result<u64> {
        let cutoff = Utc::now() - ttl;
        let mut purged = 0u64;
        let mut tokens = self.tokens.write().await;
        for records in tokens.values_mut() {
            let before = records.len();
            records.retain(|r| r.created_at > cutoff);
            purged += (before - records.len()) as u64;
        }
        Ok(purged)
    }
}

/// Postgres-backed credential store
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::models::{NewUser, User};
use crate::store::AuthStore;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Postgres error code for unique_violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[async_trait]
impl AuthStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, is_active, email_verified, created_at, updated_at)
            VALUES (gen_random_uuid(), $1, $2, $3, $4, TRUE, FALSE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::DuplicateEmail
            } else {
                e.into()
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_last_login(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User> {
        // SET expressions all read the old row, so the verified flag is
        // cleared based on the email before this update.
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email_verified = CASE
                    WHEN $3::TEXT IS NOT NULL AND $3 <> email THEN FALSE
                    ELSE email_verified
                END,
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::EmailTaken
            } else if matches!(e, sqlx::Error::RowNotFound) {
                AuthError::Unauthorized
            } else {
                e.into()
            }
        })
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_active = $1, updated_at = NOW() WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn push_refresh_token(&self, user_id: Uuid, token: &str, cap: usize) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, created_at)
            VALUES (gen_random_uuid(), $1, $2, NOW())
            "#,
        )
        .bind(user_id)
        .bind(token)
        .execute(&mut *tx)
        .await?;

        // FIFO eviction: keep the newest `cap` records.
        sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE user_id = $1
              AND id IN (
                  SELECT id FROM refresh_tokens
                  WHERE user_id = $1
                  ORDER BY created_at DESC, id DESC
                  OFFSET $2
              )
            "#,
        )
        .bind(user_id)
        .bind(cap as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn refresh_token_exists(
        &self,
        user_id: Uuid,
        token: &str,
        ttl: Duration,
    ) -> Result<bool> {
        let cutoff = Utc::now() - ttl;
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM refresh_tokens
                WHERE user_id = $1 AND token = $2 AND created_at > $3
            )
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn remove_refresh_token(&self, user_id: Uuid, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_all_refresh_tokens(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_refresh_tokens(&self, user_id: Uuid) -> Result<usize> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count as usize)
    }

    async fn purge_expired_tokens(&self, ttl: Duration) -> Result<u64> {
        let cutoff = Utc::now() - ttl;
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE created_at <= $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

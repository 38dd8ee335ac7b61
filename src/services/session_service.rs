/// The credential lifecycle state machine.
///
/// Orchestrates signup, signin, refresh, signout, forced revocation on
/// password change and deactivation, and the per-account refresh credential
/// cap. Token verification alone never grants access to revocable flows; the
/// presented refresh token must also match a live store record.
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::models::{
    normalize_email, AccessTokenData, AuthSession, NewUser, Role, TokenPair, User, UserProfile,
};
use crate::security::{self, JwtKeys};
use crate::store::AuthStore;

pub struct SessionService {
    store: Arc<dyn AuthStore>,
    keys: JwtKeys,
    bcrypt_cost: u32,
    refresh_token_cap: usize,
}

impl SessionService {
    pub fn new(
        store: Arc<dyn AuthStore>,
        keys: JwtKeys,
        bcrypt_cost: u32,
        refresh_token_cap: usize,
    ) -> Self {
        Self {
            store,
            keys,
            bcrypt_cost,
            refresh_token_cap,
        }
    }

    /// Register a new account and sign it in.
    ///
    /// The email pre-check is a fast path only; under concurrent signups the
    /// store's uniqueness constraint is the authoritative `DuplicateEmail`
    /// signal.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthSession> {
        let email = normalize_email(email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .store
            .create_user(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
                role: Role::User,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        self.issue_session(user).await
    }

    /// Authenticate with email and password and open a new device session.
    pub async fn signin(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = normalize_email(email);

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        if !self.verify_password(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "user signed in");
        self.issue_session(user).await
    }

    /// Exchange a live refresh token for a new access token.
    ///
    /// The refresh credential is not rotated: the same token stays valid
    /// until its own expiry or explicit revocation. Every failure mode (bad
    /// signature, expiry, revoked or unknown record, missing or inactive
    /// account) collapses into `InvalidRefreshToken`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessTokenData> {
        let claims = self
            .keys
            .verify_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !user.is_active {
            return Err(AuthError::InvalidRefreshToken);
        }

        let live = self
            .store
            .refresh_token_exists(user.id, refresh_token, self.keys.refresh_ttl())
            .await?;
        if !live {
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token = self.keys.issue_access_token(&user)?;
        tracing::debug!(user_id = %user.id, "access token refreshed");

        Ok(AccessTokenData {
            access_token,
            access_token_expires_in: self.keys.access_ttl().num_seconds(),
        })
    }

    /// Sign out one device (when a refresh token is given) or all devices.
    /// Removing an already-absent credential is not an error.
    pub async fn signout(&self, user_id: Uuid, refresh_token: Option<&str>) -> Result<()> {
        match refresh_token {
            Some(token) => self.store.remove_refresh_token(user_id, token).await?,
            None => self.store.remove_all_refresh_tokens(user_id).await?,
        }
        tracing::info!(%user_id, "user signed out");
        Ok(())
    }

    pub async fn signout_all(&self, user_id: Uuid) -> Result<()> {
        self.store.remove_all_refresh_tokens(user_id).await?;
        tracing::info!(%user_id, "user signed out of all devices");
        Ok(())
    }

    /// Replace the long-term secret, then revoke every refresh credential so
    /// all devices must re-authenticate with the new password.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !self
            .verify_password(current_password, &user.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = self.hash_password(new_password).await?;
        self.store.update_password(user.id, &password_hash).await?;
        self.store.remove_all_refresh_tokens(user.id).await?;

        tracing::info!(%user_id, "password changed, all sessions revoked");
        Ok(())
    }

    /// Deactivate the account and revoke all refresh credentials. Already
    /// issued access tokens die on their own short expiry.
    pub async fn deactivate(&self, user_id: Uuid) -> Result<()> {
        self.store.set_active(user_id, false).await?;
        self.store.remove_all_refresh_tokens(user_id).await?;
        tracing::info!(%user_id, "account deactivated");
        Ok(())
    }

    /// Update name and/or email. Changing the email resets the verified flag.
    /// Sessions are untouched.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserProfile> {
        let normalized = email.map(normalize_email);
        if let Some(email) = normalized.as_deref() {
            if let Some(existing) = self.store.find_user_by_email(email).await? {
                if existing.id != user_id {
                    return Err(AuthError::EmailTaken);
                }
            }
        }

        let user = self
            .store
            .update_profile(user_id, name, normalized.as_deref())
            .await?;
        Ok(user.into())
    }

    pub async fn get_me(&self, user_id: Uuid) -> Result<UserProfile> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        Ok(user.into())
    }

    /// Entry point for the authorization middleware: verify a presented
    /// access token and resolve it to a live account.
    pub async fn authenticate(&self, access_token: &str) -> Result<UserProfile> {
        let claims = self
            .keys
            .verify_access_token(access_token)
            .map_err(|_| AuthError::Unauthorized)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::Unauthorized)?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        Ok(user.into())
    }

    /// Mint both tokens, record the refresh credential (with FIFO cap
    /// eviction) and stamp the login time.
    async fn issue_session(&self, mut user: User) -> Result<AuthSession> {
        let access_token = self.keys.issue_access_token(&user)?;
        let refresh_token = self.keys.issue_refresh_token(user.id)?;

        self.store
            .push_refresh_token(user.id, &refresh_token, self.refresh_token_cap)
            .await?;
        self.store.update_last_login(user.id).await?;
        user.last_login_at = Some(chrono::Utc::now());

        Ok(AuthSession {
            user: user.into(),
            tokens: TokenPair {
                access_token,
                refresh_token,
                access_token_expires_in: self.keys.access_ttl().num_seconds(),
                refresh_token_expires_in: self.keys.refresh_ttl().num_seconds(),
            },
        })
    }

    /// bcrypt is CPU-bound; run it off the async runtime.
    async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || security::hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || security::verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))?
    }
}

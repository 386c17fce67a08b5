// src/auth/secret.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{
    AuthorizationStrategy, Caller, Credential, Decision, Operation, SHARED_TEACHER_IDENTITY,
    credential::is_header_safe,
};
use crate::{
    config::AuthMode,
    error::AppError,
    models::{quiz::ActionResult, role::Role},
    storage,
    utils::hash::{hash_secret, secret_matches},
};

const UNSENDABLE_SECRET: &str =
    "Password must use printable ASCII characters without leading or trailing spaces";

/// Shared-secret strategy: one teacher password, re-checked on every privileged call.
///
/// Only an Argon2 hash is stored. Rotation swaps the hash atomically, which
/// invalidates every copy of the old secret held by clients.
pub struct SharedSecret {
    pool: SqlitePool,
}

impl SharedSecret {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores `initial` as the secret unless one is already stored.
    pub async fn seed(&self, initial: Option<&str>) -> Result<(), AppError> {
        if storage::secret::fetch_secret_hash(&self.pool).await?.is_some() {
            return Ok(());
        }
        match initial {
            Some(secret) => {
                if !is_header_safe(secret) {
                    return Err(AppError::BadRequest(UNSENDABLE_SECRET.to_string()));
                }
                let hash = hash_secret(secret)?;
                if storage::secret::seed_secret_hash(&self.pool, &hash).await? {
                    tracing::info!("Teacher secret initialized");
                }
            }
            None => {
                tracing::warn!("No teacher secret stored and TEACHER_SECRET unset; teacher operations are locked");
            }
        }
        Ok(())
    }

    async fn matches(&self, secret: &str) -> Result<bool, AppError> {
        match storage::secret::fetch_secret_hash(&self.pool).await? {
            Some(hash) => secret_matches(secret, &hash),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AuthorizationStrategy for SharedSecret {
    fn mode(&self) -> AuthMode {
        AuthMode::Secret
    }

    async fn authorize(&self, _op: Operation, credential: &Credential) -> Result<Decision, AppError> {
        let Credential::Secret(secret) = credential else {
            return Ok(Decision::Deny("Teacher password required".to_string()));
        };

        if !self.matches(secret).await? {
            return Ok(Decision::Deny("Invalid password".to_string()));
        }

        Ok(Decision::Allow(Caller {
            identity: SHARED_TEACHER_IDENTITY.to_string(),
            role: Role::Admin,
        }))
    }

    async fn verify_secret(&self, secret: &str) -> Result<bool, AppError> {
        self.matches(secret).await
    }

    async fn change_secret(&self, old: &str, new: &str) -> Result<ActionResult, AppError> {
        if new.trim().is_empty() {
            return Ok(ActionResult::failed("New password must not be empty"));
        }
        if !is_header_safe(new) {
            return Ok(ActionResult::failed(UNSENDABLE_SECRET));
        }

        let Some(current_hash) = storage::secret::fetch_secret_hash(&self.pool).await? else {
            return Ok(ActionResult::failed("No teacher password is configured"));
        };

        if !secret_matches(old, &current_hash)? {
            return Ok(ActionResult::failed("Current password is incorrect"));
        }

        let new_hash = hash_secret(new)?;
        if !storage::secret::swap_secret_hash(&self.pool, &current_hash, &new_hash).await? {
            return Ok(ActionResult::failed(
                "Password was changed by another session; sign in again",
            ));
        }

        tracing::info!("Teacher secret rotated");
        Ok(ActionResult::ok("Password changed successfully"))
    }
}

// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    auth::{AuthorizationStrategy, role::RoleBased, secret::SharedSecret},
    config::{AuthMode, Config},
    error::AppError,
};

pub type Gate = Arc<dyn AuthorizationStrategy>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub gate: Gate,
}

impl AppState {
    /// Builds the configured strategy and seeds its credential store.
    pub async fn new(pool: SqlitePool, config: Config) -> Result<Self, AppError> {
        let gate: Gate = match config.auth_mode {
            AuthMode::Role => {
                let strategy = RoleBased::new(pool.clone(), config.jwt_secret.clone());
                if let Some(admin) = &config.admin_identity {
                    strategy.seed_admin(admin).await?;
                }
                Arc::new(strategy)
            }
            AuthMode::Secret => {
                let strategy = SharedSecret::new(pool.clone());
                strategy.seed(config.teacher_secret.as_deref()).await?;
                Arc::new(strategy)
            }
        };

        tracing::info!("Authorization strategy: {:?}", config.auth_mode);

        Ok(Self { pool, config, gate })
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Gate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

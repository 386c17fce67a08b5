// src/config.rs

use std::{env, net::SocketAddr, str::FromStr};

use dotenvy::dotenv;

/// Which authorization strategy gates the teacher-only operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Bearer token identity plus a role stored in `user_roles`.
    Role,
    /// One shared teacher secret sent with every privileged call.
    Secret,
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "role" => Ok(AuthMode::Role),
            "secret" | "password" => Ok(AuthMode::Secret),
            other => Err(ConfigError::InvalidValue(
                "AUTH_STRATEGY".to_string(),
                format!("expected 'role' or 'secret', got '{}'", other),
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_mode: AuthMode,
    pub jwt_secret: String,
    /// Seeded as the shared secret when none is stored yet.
    pub teacher_secret: Option<String>,
    /// Seeded with the `admin` role at startup.
    pub admin_identity: Option<String>,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("auth_mode", &self.auth_mode)
            .field("jwt_secret", &"[REDACTED]")
            .field("teacher_secret", &self.teacher_secret.as_ref().map(|_| "[REDACTED]"))
            .field("admin_identity", &self.admin_identity)
            .field("bind_addr", &self.bind_addr)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quiz.db?mode=rwc".to_string());

        let auth_mode = match env::var("AUTH_STRATEGY") {
            Ok(raw) => raw.parse()?,
            Err(_) => AuthMode::Secret,
        };

        let jwt_secret = non_empty_var("JWT_SECRET");
        let jwt_secret = match (auth_mode, jwt_secret) {
            (_, Some(secret)) => secret,
            (AuthMode::Role, None) => return Err(ConfigError::MissingVar("JWT_SECRET".to_string())),
            // Tokens are never checked under the secret strategy.
            (AuthMode::Secret, None) => String::new(),
        };

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDR".to_string(), e.to_string()))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            auth_mode,
            jwt_secret,
            teacher_secret: non_empty_var("TEACHER_SECRET"),
            admin_identity: non_empty_var("ADMIN_IDENTITY"),
            bind_addr,
            rust_log,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

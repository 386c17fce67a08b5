// src/auth/credential.rs

use std::{convert::Infallible, fmt};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::{config::AuthMode, state::Gate};

pub const SECRET_HEADER: &str = "x-teacher-secret";

/// Whether `secret` reaches the server unchanged inside the secret header:
/// printable ASCII only, no leading or trailing spaces.
pub fn is_header_safe(secret: &str) -> bool {
    !secret.is_empty()
        && secret.trim() == secret
        && secret.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// Credential presented with a single request. Nothing is remembered server-side.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Anonymous,
    /// Identity token from `Authorization: Bearer <token>`.
    Bearer(String),
    /// Shared teacher secret from the `X-Teacher-Secret` header.
    Secret(String),
}

impl Credential {
    /// Reads only the header the active strategy understands.
    pub fn from_headers(headers: &HeaderMap, mode: AuthMode) -> Self {
        match mode {
            AuthMode::Secret => headers
                .get(SECRET_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(|secret| Credential::Secret(secret.to_string()))
                .unwrap_or(Credential::Anonymous),
            AuthMode::Role => headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| Credential::Bearer(token.to_string()))
                .unwrap_or(Credential::Anonymous),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Anonymous => f.write_str("Anonymous"),
            Credential::Bearer(_) => f.write_str("Bearer([REDACTED])"),
            Credential::Secret(_) => f.write_str("Secret([REDACTED])"),
        }
    }
}

impl<S> FromRequestParts<S> for Credential
where
    Gate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Gate::from_ref(state);
        Ok(Credential::from_headers(&parts.headers, gate.mode()))
    }
}

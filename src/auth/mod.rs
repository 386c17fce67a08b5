// src/auth/mod.rs

//! Authorization gate for teacher-only operations.
//!
//! Two interchangeable strategies implement [`AuthorizationStrategy`]; handlers only
//! ever call [`require`] with the credential that arrived on the request.

pub mod credential;
pub mod role;
pub mod secret;

use async_trait::async_trait;

use crate::{
    config::AuthMode,
    error::AppError,
    models::{quiz::ActionResult, role::Role},
};

pub use credential::Credential;

/// Identity used as the author of quizzes created under the shared-secret strategy.
pub const SHARED_TEACHER_IDENTITY: &str = "teacher";

/// Privileged operations passing through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateQuiz,
    UpdateQuiz,
    PublishQuiz,
    ListOwnQuizzes,
    ListAllQuizzes,
    ListAttempts,
    ResultStats,
    ListAllAttempts,
    StudentAttempts,
    ChangeSecret,
    AssignRole,
}

impl Operation {
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Operation::ListAllQuizzes | Operation::ListAllAttempts | Operation::AssignRole
        )
    }
}

/// The authenticated principal behind an allowed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub identity: String,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(Caller),
    Deny(String),
}

#[async_trait]
pub trait AuthorizationStrategy: Send + Sync {
    fn mode(&self) -> AuthMode;

    /// Decides whether `credential` may perform `op`. Never touches quizzes or attempts.
    async fn authorize(&self, op: Operation, credential: &Credential) -> Result<Decision, AppError>;

    async fn verify_secret(&self, _secret: &str) -> Result<bool, AppError> {
        Err(self.unavailable("verifySecret"))
    }

    /// Rotates the shared secret. Mismatches are reported in the result, not as errors.
    async fn change_secret(&self, _old: &str, _new: &str) -> Result<ActionResult, AppError> {
        Err(self.unavailable("changeSecret"))
    }

    /// Identity and current role of the bearer of `credential`.
    async fn role_of(&self, _credential: &Credential) -> Result<Caller, AppError> {
        Err(self.unavailable("getRole"))
    }

    async fn register(&self, _credential: &Credential) -> Result<Role, AppError> {
        Err(self.unavailable("register"))
    }

    async fn assign_role(&self, _identity: &str, _role: Role) -> Result<(), AppError> {
        Err(self.unavailable("assignRole"))
    }

    fn unavailable(&self, op: &str) -> AppError {
        AppError::BadRequest(format!(
            "{} is not available under the configured authorization strategy",
            op
        ))
    }
}

/// Runs the gate and turns a denial into `AuthError` before any storage access.
pub async fn require(
    gate: &dyn AuthorizationStrategy,
    op: Operation,
    credential: &Credential,
) -> Result<Caller, AppError> {
    match gate.authorize(op, credential).await? {
        Decision::Allow(caller) => Ok(caller),
        Decision::Deny(reason) => {
            tracing::warn!(operation = ?op, mode = ?gate.mode(), "Authorization denied: {}", reason);
            Err(AppError::AuthError(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_only_operations() {
        assert!(Operation::ListAllQuizzes.requires_admin());
        assert!(Operation::ListAllAttempts.requires_admin());
        assert!(Operation::AssignRole.requires_admin());
        assert!(!Operation::CreateQuiz.requires_admin());
        assert!(!Operation::ChangeSecret.requires_admin());
    }
}

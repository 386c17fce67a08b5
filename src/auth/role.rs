// src/auth/role.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{AuthorizationStrategy, Caller, Credential, Decision, Operation};
use crate::{
    config::AuthMode,
    error::AppError,
    models::role::Role,
    storage,
    utils::jwt::verify_jwt,
};

/// Role-based strategy: bearer token names the identity, the role table decides.
///
/// The role is read on every call, so registration and role changes take effect
/// on the very next request.
pub struct RoleBased {
    pool: SqlitePool,
    jwt_secret: String,
}

impl RoleBased {
    pub fn new(pool: SqlitePool, jwt_secret: String) -> Self {
        Self { pool, jwt_secret }
    }

    /// Grants `admin` to the configured identity if it has no role row yet.
    /// A later demotion through `assign_role` survives restarts.
    pub async fn seed_admin(&self, identity: &str) -> Result<(), AppError> {
        if storage::role::seed_role(&self.pool, identity, Role::Admin).await? {
            tracing::info!("Seeded admin identity: {}", identity);
        }
        Ok(())
    }

    fn identity(&self, credential: &Credential) -> Option<String> {
        match credential {
            Credential::Bearer(token) => verify_jwt(token, &self.jwt_secret).ok().map(|c| c.sub),
            _ => None,
        }
    }

    fn require_identity(&self, credential: &Credential) -> Result<String, AppError> {
        self.identity(credential)
            .ok_or_else(|| AppError::AuthError("Sign in to continue".to_string()))
    }
}

#[async_trait]
impl AuthorizationStrategy for RoleBased {
    fn mode(&self) -> AuthMode {
        AuthMode::Role
    }

    async fn authorize(&self, op: Operation, credential: &Credential) -> Result<Decision, AppError> {
        let Some(identity) = self.identity(credential) else {
            return Ok(Decision::Deny("Sign in to continue".to_string()));
        };

        let role = storage::role::fetch_role(&self.pool, &identity).await?;

        if !role.is_teacher() {
            return Ok(Decision::Deny("Register as a teacher to continue".to_string()));
        }
        if op.requires_admin() && role != Role::Admin {
            return Ok(Decision::Deny("Admin role required".to_string()));
        }

        Ok(Decision::Allow(Caller { identity, role }))
    }

    /// Callers without a valid token are anonymous guests.
    async fn role_of(&self, credential: &Credential) -> Result<Caller, AppError> {
        let Some(identity) = self.identity(credential) else {
            return Ok(Caller {
                identity: String::new(),
                role: Role::Guest,
            });
        };
        let role = storage::role::fetch_role(&self.pool, &identity).await?;
        Ok(Caller { identity, role })
    }

    async fn register(&self, credential: &Credential) -> Result<Role, AppError> {
        let identity = self.require_identity(credential)?;
        let role = storage::role::register(&self.pool, &identity).await?;
        tracing::info!("Registered teacher {} (role: {})", identity, role);
        Ok(role)
    }

    async fn assign_role(&self, identity: &str, role: Role) -> Result<(), AppError> {
        if identity.trim().is_empty() {
            return Err(AppError::BadRequest("Identity must not be empty".to_string()));
        }
        storage::role::set_role(&self.pool, identity, role).await?;
        tracing::info!("Assigned role {} to {}", role, identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::sign_jwt;

    const KEY: &str = "role-test-key";

    async fn strategy() -> RoleBased {
        let pool = storage::connect_in_memory().await.unwrap();
        RoleBased::new(pool, KEY.to_string())
    }

    fn bearer(identity: &str) -> Credential {
        Credential::Bearer(sign_jwt(identity, KEY, 60).unwrap())
    }

    #[tokio::test]
    async fn new_identity_is_guest_and_denied() {
        let gate = strategy().await;
        let caller = gate.role_of(&bearer("alice")).await.unwrap();
        assert_eq!(caller.role, Role::Guest);

        let decision = gate.authorize(Operation::CreateQuiz, &bearer("alice")).await.unwrap();
        assert!(matches!(decision, Decision::Deny(_)));
    }

    #[tokio::test]
    async fn registration_is_visible_immediately() {
        let gate = strategy().await;
        assert_eq!(gate.register(&bearer("alice")).await.unwrap(), Role::User);

        let decision = gate.authorize(Operation::CreateQuiz, &bearer("alice")).await.unwrap();
        assert_eq!(
            decision,
            Decision::Allow(Caller {
                identity: "alice".to_string(),
                role: Role::User
            })
        );
    }

    #[tokio::test]
    async fn re_registering_never_demotes() {
        let gate = strategy().await;
        gate.seed_admin("root").await.unwrap();
        assert_eq!(gate.register(&bearer("root")).await.unwrap(), Role::Admin);
        gate.register(&bearer("alice")).await.unwrap();
        assert_eq!(gate.register(&bearer("alice")).await.unwrap(), Role::User);
    }

    #[tokio::test]
    async fn anonymous_caller_is_a_guest() {
        let gate = strategy().await;
        let forged = Credential::Bearer(sign_jwt("alice", "other-key", 60).unwrap());
        for credential in [Credential::Anonymous, forged] {
            let caller = gate.role_of(&credential).await.unwrap();
            assert_eq!(caller.role, Role::Guest);
            assert!(caller.identity.is_empty());
        }
    }

    #[tokio::test]
    async fn admin_seed_does_not_undo_demotion() {
        let gate = strategy().await;
        gate.seed_admin("root").await.unwrap();
        assert_eq!(gate.role_of(&bearer("root")).await.unwrap().role, Role::Admin);

        gate.assign_role("root", Role::User).await.unwrap();
        gate.seed_admin("root").await.unwrap();
        assert_eq!(gate.role_of(&bearer("root")).await.unwrap().role, Role::User);
    }

    #[tokio::test]
    async fn admin_operations_need_admin() {
        let gate = strategy().await;
        gate.register(&bearer("alice")).await.unwrap();
        let decision = gate
            .authorize(Operation::ListAllQuizzes, &bearer("alice"))
            .await
            .unwrap();
        assert!(matches!(decision, Decision::Deny(_)));

        gate.assign_role("alice", Role::Admin).await.unwrap();
        let decision = gate
            .authorize(Operation::ListAllQuizzes, &bearer("alice"))
            .await
            .unwrap();
        assert!(matches!(decision, Decision::Allow(_)));
    }

    #[tokio::test]
    async fn demotion_revokes_access() {
        let gate = strategy().await;
        gate.register(&bearer("alice")).await.unwrap();
        gate.assign_role("alice", Role::Guest).await.unwrap();
        let decision = gate.authorize(Operation::CreateQuiz, &bearer("alice")).await.unwrap();
        assert!(matches!(decision, Decision::Deny(_)));
    }

    #[tokio::test]
    async fn forged_or_missing_tokens_are_denied() {
        let gate = strategy().await;
        let forged = Credential::Bearer(sign_jwt("alice", "other-key", 60).unwrap());
        for credential in [forged, Credential::Anonymous, Credential::Secret("x".into())] {
            let decision = gate.authorize(Operation::CreateQuiz, &credential).await.unwrap();
            assert!(matches!(decision, Decision::Deny(_)));
        }
    }

    #[tokio::test]
    async fn secret_operations_are_unavailable() {
        let gate = strategy().await;
        assert!(matches!(gate.verify_secret("abc").await, Err(AppError::BadRequest(_))));
    }
}

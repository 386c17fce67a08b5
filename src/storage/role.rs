// src/storage/role.rs

use sqlx::SqlitePool;

use crate::models::role::Role;

/// Current role of `identity`; identities without a row are guests.
pub async fn fetch_role(pool: &SqlitePool, identity: &str) -> Result<Role, sqlx::Error> {
    let stored = sqlx::query_scalar::<_, String>("SELECT role FROM user_roles WHERE identity = ?")
        .bind(identity)
        .fetch_optional(pool)
        .await?;

    match stored {
        None => Ok(Role::Guest),
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(e.into())),
    }
}

/// guest -> user in a single statement. Users and admins are left as they are.
/// Returns the role after the transition.
pub async fn register(pool: &SqlitePool, identity: &str) -> Result<Role, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_roles (identity, role, updated_at)
        VALUES (?, 'user', ?)
        ON CONFLICT (identity) DO UPDATE SET
            role = 'user',
            updated_at = excluded.updated_at
        WHERE user_roles.role = 'guest'
        "#,
    )
    .bind(identity)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    fetch_role(pool, identity).await
}

/// Inserts `role` only if `identity` has no row yet. Returns `true` if it inserted.
pub async fn seed_role(pool: &SqlitePool, identity: &str, role: Role) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_roles (identity, role, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT (identity) DO NOTHING
        "#,
    )
    .bind(identity)
    .bind(role.as_str())
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Sets any role, including demotion.
pub async fn set_role(pool: &SqlitePool, identity: &str, role: Role) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_roles (identity, role, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT (identity) DO UPDATE SET
            role = excluded.role,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(identity)
    .bind(role.as_str())
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

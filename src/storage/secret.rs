// src/storage/secret.rs

use sqlx::SqlitePool;

const SECRET_KEY: &str = "teacher_secret_hash";

pub async fn fetch_secret_hash(pool: &SqlitePool) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
        .bind(SECRET_KEY)
        .fetch_optional(pool)
        .await
}

/// Stores the first secret hash. Returns `false` if one is already stored.
pub async fn seed_secret_hash(pool: &SqlitePool, hash: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT (key) DO NOTHING",
    )
    .bind(SECRET_KEY)
    .bind(hash)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Compare-and-swap of the stored hash.
///
/// Succeeds only if the stored value is still `expected`, so two rotations that
/// both verified against the same old secret cannot both win.
pub async fn swap_secret_hash(
    pool: &SqlitePool,
    expected: &str,
    new_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE settings SET value = ? WHERE key = ? AND value = ?")
        .bind(new_hash)
        .bind(SECRET_KEY)
        .bind(expected)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

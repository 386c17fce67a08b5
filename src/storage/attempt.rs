// src/storage/attempt.rs

use sqlx::{SqlitePool, types::Json};

use crate::models::attempt::StudentAttempt;

const ATTEMPT_COLUMNS: &str =
    "student_id, student_name, course, quiz_id, answers, score, timestamp";

/// Atomic check-and-insert keyed by `(student_id, quiz_id)`.
///
/// Returns `true` if this call created the ledger row, `false` if one already existed.
/// Concurrent callers for the same key see exactly one `true`.
pub async fn insert_if_absent(
    pool: &SqlitePool,
    attempt: &StudentAttempt,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attempts (student_id, student_name, course, quiz_id, answers, score, timestamp)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (student_id, quiz_id) DO NOTHING
        "#,
    )
    .bind(&attempt.student_id)
    .bind(&attempt.student_name)
    .bind(&attempt.course)
    .bind(&attempt.quiz_id)
    .bind(Json(&attempt.answers))
    .bind(attempt.score)
    .bind(attempt.timestamp)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn fetch_attempt(
    pool: &SqlitePool,
    student_id: &str,
    quiz_id: &str,
) -> Result<Option<StudentAttempt>, sqlx::Error> {
    sqlx::query_as::<_, StudentAttempt>(&format!(
        "SELECT {} FROM attempts WHERE student_id = ? AND quiz_id = ?",
        ATTEMPT_COLUMNS
    ))
    .bind(student_id)
    .bind(quiz_id)
    .fetch_optional(pool)
    .await
}

pub async fn has_attempted(
    pool: &SqlitePool,
    student_id: &str,
    quiz_id: &str,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM attempts WHERE student_id = ? AND quiz_id = ?)",
    )
    .bind(student_id)
    .bind(quiz_id)
    .fetch_one(pool)
    .await?;

    Ok(exists != 0)
}

pub async fn list_for_quiz(
    pool: &SqlitePool,
    quiz_id: &str,
) -> Result<Vec<StudentAttempt>, sqlx::Error> {
    sqlx::query_as::<_, StudentAttempt>(&format!(
        "SELECT {} FROM attempts WHERE quiz_id = ? ORDER BY timestamp ASC",
        ATTEMPT_COLUMNS
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub async fn list_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<StudentAttempt>, sqlx::Error> {
    sqlx::query_as::<_, StudentAttempt>(&format!(
        "SELECT {} FROM attempts WHERE student_id = ? ORDER BY timestamp ASC",
        ATTEMPT_COLUMNS
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<StudentAttempt>, sqlx::Error> {
    sqlx::query_as::<_, StudentAttempt>(&format!(
        "SELECT {} FROM attempts ORDER BY timestamp ASC",
        ATTEMPT_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

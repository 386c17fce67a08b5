// src/storage/quiz.rs

use sqlx::{SqlitePool, types::Json};

use crate::models::quiz::{Question, Quiz, QuizPayload};

const QUIZ_COLUMNS: &str = "id, title, description, published, author, questions, created_at";

/// Inserts a new draft quiz owned by `author`.
pub async fn insert_quiz(
    pool: &SqlitePool,
    author: &str,
    payload: QuizPayload,
) -> Result<Quiz, sqlx::Error> {
    let quiz = Quiz {
        id: uuid::Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        published: false,
        author: author.to_string(),
        questions: payload.questions,
        created_at: chrono::Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO quizzes (id, title, description, published, author, questions, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&quiz.id)
    .bind(&quiz.title)
    .bind(&quiz.description)
    .bind(quiz.published)
    .bind(&quiz.author)
    .bind(Json(&quiz.questions))
    .bind(quiz.created_at)
    .execute(pool)
    .await?;

    Ok(quiz)
}

pub async fn fetch_quiz(pool: &SqlitePool, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {} FROM quizzes WHERE id = ?", QUIZ_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Replaces title, description and the whole question set in one statement.
/// Returns `false` when no quiz has this id.
pub async fn update_quiz(
    pool: &SqlitePool,
    id: &str,
    payload: &QuizPayload,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE quizzes
        SET title = ?, description = ?, questions = ?
        WHERE id = ?
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(Json::<&Vec<Question>>(&payload.questions))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Flips a draft to published. Returns `false` if it was already published (or absent).
pub async fn publish_quiz(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE quizzes SET published = TRUE WHERE id = ? AND published = FALSE")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_published(pool: &SqlitePool) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {} FROM quizzes WHERE published = TRUE ORDER BY created_at DESC",
        QUIZ_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_by_author(pool: &SqlitePool, author: &str) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {} FROM quizzes WHERE author = ? ORDER BY created_at DESC",
        QUIZ_COLUMNS
    ))
    .bind(author)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {} FROM quizzes ORDER BY created_at DESC",
        QUIZ_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

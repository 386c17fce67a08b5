// src/handlers/teacher.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use super::student::quiz_not_found;
use crate::{
    auth::{Caller, Credential, Operation, require},
    error::AppError,
    models::{
        attempt::{Answer, aggregate},
        quiz::{ActionResult, CreatedQuiz, Quiz, QuizPayload},
        student::{Student, StudentQuery},
    },
    state::Gate,
    storage,
};

/// Loads a quiz the caller may manage: its author, or any admin.
/// Other teachers see the same `NotFound` as for a missing id.
async fn owned_quiz(pool: &SqlitePool, caller: &Caller, id: &str) -> Result<Quiz, AppError> {
    let quiz = storage::quiz::fetch_quiz(pool, id)
        .await?
        .ok_or_else(quiz_not_found)?;

    if !caller.is_admin() && quiz.author != caller.identity {
        return Err(quiz_not_found());
    }

    Ok(quiz)
}

/// Creates a draft quiz owned by the caller.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
    Json(payload): Json<QuizPayload>,
) -> Result<impl IntoResponse, AppError> {
    let caller = require(gate.as_ref(), Operation::CreateQuiz, &credential).await?;
    let payload = payload.into_checked()?;

    let quiz = storage::quiz::insert_quiz(&pool, &caller.identity, payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            AppError::from(e)
        })?;

    tracing::info!(quiz = %quiz.id, author = %quiz.author, "Quiz created");

    Ok((StatusCode::CREATED, Json(CreatedQuiz { quiz_id: quiz.id })))
}

/// Replaces title, description and the whole question set. Publication state is kept.
pub async fn update_quiz(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
    Path(id): Path<String>,
    Json(payload): Json<QuizPayload>,
) -> Result<Json<ActionResult>, AppError> {
    let caller = require(gate.as_ref(), Operation::UpdateQuiz, &credential).await?;
    let payload = payload.into_checked()?;
    owned_quiz(&pool, &caller, &id).await?;

    if !storage::quiz::update_quiz(&pool, &id, &payload).await? {
        return Err(quiz_not_found());
    }

    tracing::info!(quiz = %id, "Quiz updated");
    Ok(Json(ActionResult::ok("Quiz updated successfully")))
}

/// One-way draft -> published. Publishing twice is not an error.
pub async fn publish_quiz(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
    Path(id): Path<String>,
) -> Result<Json<ActionResult>, AppError> {
    let caller = require(gate.as_ref(), Operation::PublishQuiz, &credential).await?;
    owned_quiz(&pool, &caller, &id).await?;

    if storage::quiz::publish_quiz(&pool, &id).await? {
        tracing::info!(quiz = %id, "Quiz published");
        Ok(Json(ActionResult::ok("Quiz published successfully")))
    } else {
        Ok(Json(ActionResult::ok("Quiz is already published")))
    }
}

pub async fn list_own_quizzes(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
) -> Result<Json<Vec<Quiz>>, AppError> {
    let caller = require(gate.as_ref(), Operation::ListOwnQuizzes, &credential).await?;
    Ok(Json(storage::quiz::list_by_author(&pool, &caller.identity).await?))
}

/// Admin only.
pub async fn list_all_quizzes(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
) -> Result<Json<Vec<Quiz>>, AppError> {
    require(gate.as_ref(), Operation::ListAllQuizzes, &credential).await?;
    Ok(Json(storage::quiz::list_all(&pool).await?))
}

pub async fn list_attempts(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = require(gate.as_ref(), Operation::ListAttempts, &credential).await?;
    let quiz = owned_quiz(&pool, &caller, &id).await?;

    Ok(Json(storage::attempt::list_for_quiz(&pool, &quiz.id).await?))
}

/// Attempts plus a per-question aggregate of the recorded answers.
pub async fn result_stats(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = require(gate.as_ref(), Operation::ResultStats, &credential).await?;
    let quiz = owned_quiz(&pool, &caller, &id).await?;
    let attempts = storage::attempt::list_for_quiz(&pool, &quiz.id).await?;

    Ok(Json(aggregate(&quiz, attempts)))
}

/// `(studentId, answers)` pairs for one quiz.
pub async fn answers_by_student(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = require(gate.as_ref(), Operation::ListAttempts, &credential).await?;
    let quiz = owned_quiz(&pool, &caller, &id).await?;

    let pairs: Vec<(String, Vec<Answer>)> = storage::attempt::list_for_quiz(&pool, &quiz.id)
        .await?
        .into_iter()
        .map(|a| (a.student_id, a.answers))
        .collect();

    Ok(Json(pairs))
}

/// Admin only.
pub async fn list_all_attempts(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
) -> Result<impl IntoResponse, AppError> {
    require(gate.as_ref(), Operation::ListAllAttempts, &credential).await?;
    Ok(Json(storage::attempt::list_all(&pool).await?))
}

/// Every attempt by the student resolved from `name` and `course`.
/// Non-admins only see attempts at their own quizzes.
pub async fn attempts_for_student(
    State(pool): State<SqlitePool>,
    State(gate): State<Gate>,
    credential: Credential,
    Query(query): Query<StudentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let caller = require(gate.as_ref(), Operation::StudentAttempts, &credential).await?;
    query.validate()?;

    let student = Student::resolve(&query.name, &query.course);
    let mut attempts = storage::attempt::list_for_student(&pool, &student.id).await?;

    if !caller.is_admin() {
        let own: Vec<String> = storage::quiz::list_by_author(&pool, &caller.identity)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();
        attempts.retain(|a| own.contains(&a.quiz_id));
    }

    Ok(Json(attempts))
}

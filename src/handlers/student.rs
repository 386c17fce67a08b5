// src/handlers/student.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attempt::{
            AttemptStatus, AttemptStatusQuery, StudentAttempt, SubmitAttemptRequest,
            SubmitAttemptResponse, grade,
        },
        quiz::Quiz,
        student::{ResolveStudentRequest, Student},
    },
    storage,
};

/// Same message for absent and unpublished quizzes.
pub(crate) fn quiz_not_found() -> AppError {
    AppError::NotFound("Quiz not found".to_string())
}

/// Derives the student identity from name and course. Pure; nothing is stored.
pub async fn resolve_student(
    Json(payload): Json<ResolveStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(Student::resolve(&payload.name, &payload.course)))
}

/// Lists quizzes visible to students (published only).
pub async fn list_published(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let quizzes = storage::quiz::list_published(&pool).await.map_err(|e| {
        tracing::error!("Failed to list published quizzes: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(quizzes))
}

/// Fetches a quiz by id regardless of publication state.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Quiz>, AppError> {
    let quiz = storage::quiz::fetch_quiz(&pool, &id)
        .await?
        .ok_or_else(quiz_not_found)?;

    Ok(Json(quiz))
}

pub async fn attempt_status(
    State(pool): State<SqlitePool>,
    Query(query): Query<AttemptStatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let has_attempted =
        storage::attempt::has_attempted(&pool, &query.student_id, &query.quiz_id).await?;

    Ok(Json(AttemptStatus { has_attempted }))
}

/// Grades and records a student's single attempt at a published quiz.
///
/// * Every question must be answered exactly once.
/// * The ledger insert is an atomic check-and-insert on (student, quiz).
/// * A repeated submission returns the stored attempt unchanged with `isRetake = true`.
pub async fn submit_attempt(
    State(pool): State<SqlitePool>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<Json<SubmitAttemptResponse>, AppError> {
    req.validate()?;

    let student = Student::resolve(&req.student_name, &req.course);

    let quiz = storage::quiz::fetch_quiz(&pool, &req.quiz_id)
        .await?
        .filter(|q| q.published)
        .ok_or_else(quiz_not_found)?;

    // Retries must succeed even if the quiz changed after the first submission.
    if let Some(stored) = storage::attempt::fetch_attempt(&pool, &student.id, &quiz.id).await? {
        return Ok(Json(SubmitAttemptResponse::new(stored, true)));
    }

    let (answers, score) = grade(&quiz, &req.answers)?;

    let attempt = StudentAttempt {
        student_id: student.id,
        student_name: student.name,
        course: student.course,
        quiz_id: quiz.id,
        answers,
        score,
        timestamp: chrono::Utc::now(),
    };

    let inserted = storage::attempt::insert_if_absent(&pool, &attempt)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record attempt: {:?}", e);
            AppError::from(e)
        })?;

    if inserted {
        tracing::info!(
            student = %attempt.student_id,
            quiz = %attempt.quiz_id,
            score = attempt.score,
            "Attempt recorded"
        );
        return Ok(Json(SubmitAttemptResponse::new(attempt, false)));
    }

    // Lost the race to a concurrent submission for the same key.
    let stored = storage::attempt::fetch_attempt(&pool, &attempt.student_id, &attempt.quiz_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalServerError("Attempt vanished after conflicting insert".to_string())
        })?;

    Ok(Json(SubmitAttemptResponse::new(stored, true)))
}

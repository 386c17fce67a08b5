// src/models/attempt.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{error::AppError, models::quiz::Quiz, utils::validate::not_blank};

/// One graded answer. `correct_answer_index` is a snapshot taken at submission time,
/// so later edits to the quiz never change how a stored attempt was graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub selected_option_index: i64,
    pub correct_answer_index: i64,
    pub is_correct: bool,
}

/// Represents the 'attempts' table. At most one row per (student_id, quiz_id).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttempt {
    pub student_id: String,
    pub student_name: String,
    pub course: String,
    pub quiz_id: String,
    #[sqlx(json)]
    pub answers: Vec<Answer>,
    /// Count of correct answers.
    pub score: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// `(questionId, selectedOptionIndex)` as sent by the quiz-taking client.
pub type SubmittedAnswer = (String, i64);

/// DTO for `POST /api/attempts`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    #[validate(custom(function = not_blank), length(max = 100))]
    pub student_name: String,
    #[validate(custom(function = not_blank), length(max = 100))]
    pub course: String,
    pub quiz_id: String,
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptResponse {
    pub attempt: StudentAttempt,
    pub answers: Vec<Answer>,
    /// True when an attempt already existed; the stored attempt is returned unchanged.
    pub is_retake: bool,
    pub score: i64,
}

impl SubmitAttemptResponse {
    pub fn new(attempt: StudentAttempt, is_retake: bool) -> Self {
        Self {
            answers: attempt.answers.clone(),
            score: attempt.score,
            attempt,
            is_retake,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStatusQuery {
    pub student_id: String,
    pub quiz_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStatus {
    pub has_attempted: bool,
}

/// Grades a submission against the quiz as it is right now.
///
/// Every question must be answered exactly once. Unknown question ids and option
/// indices outside the question's options are rejected. Answers come back in quiz order.
pub fn grade(quiz: &Quiz, submitted: &[SubmittedAnswer]) -> Result<(Vec<Answer>, i64), AppError> {
    let mut selected: HashMap<&str, i64> = HashMap::with_capacity(submitted.len());

    for (question_id, index) in submitted {
        let question = quiz.question(question_id).ok_or_else(|| {
            AppError::BadRequest(format!("Question '{}' is not part of this quiz", question_id))
        })?;
        if !question.has_option(*index) {
            return Err(AppError::BadRequest(format!(
                "Option {} does not exist for question '{}'",
                index, question_id
            )));
        }
        if selected.insert(question.id.as_str(), *index).is_some() {
            return Err(AppError::BadRequest(format!(
                "Question '{}' was answered more than once",
                question_id
            )));
        }
    }

    let mut answers = Vec::with_capacity(quiz.questions.len());
    for question in &quiz.questions {
        let index = selected.get(question.id.as_str()).ok_or_else(|| {
            AppError::BadRequest("Please answer all questions before submitting".to_string())
        })?;
        answers.push(Answer {
            question_id: question.id.clone(),
            selected_option_index: *index,
            correct_answer_index: question.correct_answer_index,
            is_correct: *index == question.correct_answer_index,
        });
    }

    let score = answers.iter().filter(|a| a.is_correct).count() as i64;
    Ok((answers, score))
}

/// Per-question aggregate over all stored attempts of a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub answers: Vec<Answer>,
    pub correct_count: i64,
    /// Selections per option of the current question; stale indices are not counted.
    pub option_counts: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStats {
    pub attempts: Vec<StudentAttempt>,
    pub questions: Vec<QuestionStats>,
    pub average_score: f64,
}

pub fn aggregate(quiz: &Quiz, attempts: Vec<StudentAttempt>) -> ResultStats {
    let mut questions: Vec<QuestionStats> = quiz
        .questions
        .iter()
        .map(|q| QuestionStats {
            question_id: q.id.clone(),
            answers: Vec::new(),
            correct_count: 0,
            option_counts: vec![0; q.options.len()],
        })
        .collect();

    let positions: HashMap<&str, usize> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.id.as_str(), i))
        .collect();

    for attempt in &attempts {
        for answer in &attempt.answers {
            let Some(&pos) = positions.get(answer.question_id.as_str()) else {
                continue;
            };
            let stats = &mut questions[pos];
            if answer.is_correct {
                stats.correct_count += 1;
            }
            if let Some(count) = usize::try_from(answer.selected_option_index)
                .ok()
                .and_then(|i| stats.option_counts.get_mut(i))
            {
                *count += 1;
            }
            stats.answers.push(answer.clone());
        }
    }

    let average_score = if attempts.is_empty() {
        0.0
    } else {
        attempts.iter().map(|a| a.score as f64).sum::<f64>() / attempts.len() as f64
    };

    ResultStats {
        attempts,
        questions,
        average_score,
    }
}

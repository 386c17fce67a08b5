// src/models/quiz.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::utils::validate::not_blank;

pub const MIN_OPTIONS: usize = 2;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Opaque UUID string.
    pub id: String,

    pub title: String,

    pub description: Option<String>,

    /// Drafts are invisible to students. Publishing is one-way.
    pub published: bool,

    /// Identity of the owning teacher.
    pub author: String,

    /// Ordered question set, stored as a JSON array and replaced wholesale on update.
    #[sqlx(json)]
    pub questions: Vec<Question>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Quiz {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within its quiz.
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: i64,
}

impl Question {
    pub fn has_option(&self, index: i64) -> bool {
        index >= 0 && (index as usize) < self.options.len()
    }
}

/// DTO for creating or replacing a quiz.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    #[validate(custom(function = not_blank), length(max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = validate_questions))]
    pub questions: Vec<Question>,
}

impl QuizPayload {
    /// Validates, then trims the title and drops a blank description.
    pub fn into_checked(self) -> Result<Self, validator::ValidationErrors> {
        self.validate()?;
        Ok(Self {
            title: self.title.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            questions: self.questions,
        })
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_questions(questions: &[Question]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(invalid(
            "questions_empty",
            "Add at least one question".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for (i, q) in questions.iter().enumerate() {
        let n = i + 1;
        if q.id.trim().is_empty() {
            return Err(invalid("question_id_blank", format!("Question {} has no id", n)));
        }
        if !seen.insert(q.id.as_str()) {
            return Err(invalid(
                "question_id_duplicate",
                format!("Question id '{}' is used more than once", q.id),
            ));
        }
        if q.text.trim().is_empty() {
            return Err(invalid("question_text_blank", format!("Question {} text is required", n)));
        }
        if q.options.len() < MIN_OPTIONS {
            return Err(invalid(
                "too_few_options",
                format!("Question {} needs at least {} options", n, MIN_OPTIONS),
            ));
        }
        if q.options.iter().any(|opt| opt.trim().is_empty()) {
            return Err(invalid("option_blank", format!("Question {} has an empty option", n)));
        }
        if !q.has_option(q.correct_answer_index) {
            return Err(invalid(
                "correct_index_out_of_range",
                format!(
                    "Question {} correct answer index {} is outside 0..{}",
                    n,
                    q.correct_answer_index,
                    q.options.len()
                ),
            ));
        }
    }
    Ok(())
}

/// Uniform result of teacher mutations that report inline feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedQuiz {
    pub quiz_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, options: &[&str], correct: i64) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer_index: correct,
        }
    }

    fn payload(questions: Vec<Question>) -> QuizPayload {
        QuizPayload {
            title: "Rust basics".to_string(),
            description: None,
            questions,
        }
    }

    #[test]
    fn accepts_valid_quiz() {
        let p = payload(vec![question("q1", &["a", "b"], 1), question("q2", &["x", "y", "z"], 0)]);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        let mut p = payload(vec![question("q1", &["a", "b"], 0)]);
        p.title = "  ".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        assert!(payload(vec![question("q1", &["a", "b"], 2)]).validate().is_err());
        assert!(payload(vec![question("q1", &["a", "b"], -1)]).validate().is_err());
    }

    #[test]
    fn rejects_single_option_and_blank_option() {
        assert!(payload(vec![question("q1", &["a"], 0)]).validate().is_err());
        assert!(payload(vec![question("q1", &["a", " "], 0)]).validate().is_err());
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let p = payload(vec![question("q1", &["a", "b"], 0), question("q1", &["c", "d"], 1)]);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn rejects_empty_question_set() {
        assert!(payload(vec![]).validate().is_err());
    }

    #[test]
    fn into_checked_normalizes_title_and_description() {
        let mut p = payload(vec![question("q1", &["a", "b"], 0)]);
        p.title = "  Week 1 ".to_string();
        p.description = Some("   ".to_string());
        let checked = p.into_checked().unwrap();
        assert_eq!(checked.title, "Week 1");
        assert_eq!(checked.description, None);
    }
}

// src/models/student.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::{identity::resolve_student_id, validate::not_blank};

/// A student as seen by one session. Only the derived id is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub course: String,
}

impl Student {
    /// Trims both inputs and derives the stable student id.
    pub fn resolve(name: &str, course: &str) -> Self {
        Self {
            id: resolve_student_id(name, course),
            name: name.trim().to_string(),
            course: course.trim().to_string(),
        }
    }
}

/// DTO for `POST /api/students/resolve`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveStudentRequest {
    #[validate(custom(function = not_blank), length(max = 100))]
    pub name: String,
    #[validate(custom(function = not_blank), length(max = 100))]
    pub course: String,
}

/// Query for the per-student attempt listing.
#[derive(Debug, Deserialize, Validate)]
pub struct StudentQuery {
    #[validate(custom(function = not_blank))]
    pub name: String,
    #[validate(custom(function = not_blank))]
    pub course: String,
}

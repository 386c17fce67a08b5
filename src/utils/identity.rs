// src/utils/identity.rs

/// Joins trimmed name and course. Not expected in normal names or course codes.
pub const STUDENT_ID_SEPARATOR: &str = "__";

/// Derives the stable student key from free-text inputs.
///
/// Pure and deterministic: the same trimmed `(name, course)` always yields the same id.
/// Two different pairs can collide only when a trimmed name ends with, or a trimmed
/// course starts with, `_` so that the separator boundary shifts
/// (`("a_", "b")` and `("a", "_b")` both give `"a___b"`).
pub fn resolve_student_id(name: &str, course: &str) -> String {
    let name = name.trim();
    let course = course.trim();
    let mut id = String::with_capacity(name.len() + STUDENT_ID_SEPARATOR.len() + course.len());
    id.push_str(name);
    id.push_str(STUDENT_ID_SEPARATOR);
    id.push_str(course);
    id
}

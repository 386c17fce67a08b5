// tests/student_flow.rs

mod common;

use common::{TEACHER_SECRET, published_quiz, spawn_app, submission, two_question_quiz};
use quiz_backend::config::AuthMode;
use reqwest::StatusCode;

#[tokio::test]
async fn resolve_student_is_deterministic() {
    let app = spawn_app(AuthMode::Secret).await;
    let client = app.client();

    let first = client.resolve_student(" Ana ", "CS101").await.unwrap();
    let second = client.resolve_student("Ana", " CS101 ").await.unwrap();

    assert_eq!(first.id, "Ana__CS101");
    assert_eq!(first, second);
}

#[tokio::test]
async fn resolve_student_rejects_blank_input() {
    let app = spawn_app(AuthMode::Secret).await;
    let err = app.client().resolve_student("  ", "CS101").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn retake_keeps_original_score() {
    // Arrange
    let app = spawn_app(AuthMode::Secret).await;
    let quiz_id = published_quiz(&app).await;
    let student = app.client();

    // Act: first submission, both correct
    let first = student
        .submit_attempt(&submission("Ana", "CS101", &quiz_id, &[("q1", 0), ("q2", 1)]))
        .await
        .unwrap();

    // Assert
    assert_eq!(first.score, 2);
    assert!(!first.is_retake);
    assert!(student.has_attempted("Ana__CS101", &quiz_id).await.unwrap());

    // Act: second submission with a wrong answer
    let second = student
        .submit_attempt(&submission("Ana", "CS101", &quiz_id, &[("q1", 1), ("q2", 1)]))
        .await
        .unwrap();

    // Assert: stored result reported, ledger untouched
    assert!(second.is_retake);
    assert_eq!(second.score, 2);
    assert_eq!(second.answers, first.answers);

    let mut teacher = app.client();
    teacher.login_with_secret(TEACHER_SECRET).await.unwrap();
    let attempts = teacher.attempts(&quiz_id).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].score, 2);
    assert!(student.has_attempted("Ana__CS101", &quiz_id).await.unwrap());
}

#[tokio::test]
async fn concurrent_double_submission_creates_one_row() {
    let app = spawn_app(AuthMode::Secret).await;
    let quiz_id = published_quiz(&app).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = app.client();
        let pick = i % 2;
        let request = submission("Ben", "CS101", &quiz_id, &[("q1", pick), ("q2", 1)]);
        handles.push(tokio::spawn(async move { client.submit_attempt(&request).await }));
    }

    let mut first_inserts = 0;
    let mut scores = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        if !response.is_retake {
            first_inserts += 1;
        }
        scores.push(response.score);
    }

    assert_eq!(first_inserts, 1);
    // Every caller sees the single stored score.
    assert!(scores.windows(2).all(|w| w[0] == w[1]));

    let mut teacher = app.client();
    teacher.login_with_secret(TEACHER_SECRET).await.unwrap();
    assert_eq!(teacher.attempts(&quiz_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn has_attempted_is_false_before_submission() {
    let app = spawn_app(AuthMode::Secret).await;
    let quiz_id = published_quiz(&app).await;
    assert!(!app.client().has_attempted("Ana__CS101", &quiz_id).await.unwrap());
}

#[tokio::test]
async fn drafts_are_hidden_and_not_submittable() {
    let app = spawn_app(AuthMode::Secret).await;
    let mut teacher = app.client();
    teacher.login_with_secret(TEACHER_SECRET).await.unwrap();
    let draft_id = teacher.create_quiz(&two_question_quiz("Draft")).await.unwrap();
    let published_id = published_quiz(&app).await;

    let student = app.client();
    let listed = student.published_quizzes().await.unwrap();
    assert!(listed.iter().all(|q| q.published));
    assert!(listed.iter().any(|q| q.id == published_id));
    assert!(!listed.iter().any(|q| q.id == draft_id));

    // getQuiz does not filter on publication state
    assert_eq!(student.quiz(&draft_id).await.unwrap().id, draft_id);

    let err = student
        .submit_attempt(&submission("Ana", "CS101", &draft_id, &[("q1", 0), ("q2", 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(!student.has_attempted("Ana__CS101", &draft_id).await.unwrap());
}

#[tokio::test]
async fn unknown_quiz_is_not_found() {
    let app = spawn_app(AuthMode::Secret).await;
    let student = app.client();

    let err = student.quiz("no-such-quiz").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    let err = student
        .submit_attempt(&submission("Ana", "CS101", "no-such-quiz", &[("q1", 0)]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn incomplete_or_foreign_answers_are_rejected_without_recording() {
    let app = spawn_app(AuthMode::Secret).await;
    let quiz_id = published_quiz(&app).await;
    let student = app.client();

    for picks in [
        vec![("q1", 0)],
        vec![("q1", 0), ("q2", 1), ("q3", 0)],
        vec![("q1", 0), ("q2", 5)],
        vec![("q1", 0), ("q1", 1), ("q2", 1)],
    ] {
        let err = student
            .submit_attempt(&submission("Ana", "CS101", &quiz_id, &picks))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    assert!(!student.has_attempted("Ana__CS101", &quiz_id).await.unwrap());
}

#[tokio::test]
async fn stored_answers_keep_their_grading_after_quiz_edit() {
    let app = spawn_app(AuthMode::Secret).await;
    let quiz_id = published_quiz(&app).await;
    let student = app.client();

    student
        .submit_attempt(&submission("Ana", "CS101", &quiz_id, &[("q1", 0), ("q2", 1)]))
        .await
        .unwrap();

    // Flip both correct answers.
    let mut teacher = app.client();
    teacher.login_with_secret(TEACHER_SECRET).await.unwrap();
    let mut edited = two_question_quiz("Published, edited");
    edited.questions[0].correct_answer_index = 1;
    edited.questions[1].correct_answer_index = 0;
    assert!(teacher.update_quiz(&quiz_id, &edited).await.unwrap().success);

    let attempts = teacher.attempts(&quiz_id).await.unwrap();
    assert_eq!(attempts[0].score, 2);
    assert_eq!(attempts[0].answers[0].correct_answer_index, 0);
    assert!(attempts[0].answers.iter().all(|a| a.is_correct));

    // A retry after the edit still reports the stored attempt.
    let retry = student
        .submit_attempt(&submission("Ana", "CS101", &quiz_id, &[("q1", 1), ("q2", 0)]))
        .await
        .unwrap();
    assert!(retry.is_retake);
    assert_eq!(retry.score, 2);

    // Update keeps the publication state.
    assert!(student.quiz(&quiz_id).await.unwrap().published);
}

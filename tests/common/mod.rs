// tests/common/mod.rs

#![allow(dead_code)]

use quiz_backend::{
    client::QuizClient,
    config::{AuthMode, Config},
    models::{
        attempt::SubmitAttemptRequest,
        quiz::{Question, QuizPayload},
    },
    routes,
    state::AppState,
    storage,
    utils::jwt::sign_jwt,
};

pub const TEACHER_SECRET: &str = "abc";
pub const JWT_SECRET: &str = "test_secret_for_integration_tests";
pub const ADMIN_IDENTITY: &str = "admin-principal";

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub fn client(&self) -> QuizClient {
        QuizClient::new(&self.address)
    }

    /// Client already holding a valid identity token for `identity`.
    pub fn client_as(&self, identity: &str) -> QuizClient {
        let mut client = self.client();
        client.login_with_token(&token_for(identity));
        client
    }
}

pub fn token_for(identity: &str) -> String {
    sign_jwt(identity, JWT_SECRET, 600).expect("Failed to sign test token")
}

/// Spawns the app on a random port against a fresh in-memory database.
pub async fn spawn_app(auth_mode: AuthMode) -> TestApp {
    let pool = storage::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        auth_mode,
        jwt_secret: JWT_SECRET.to_string(),
        teacher_secret: Some(TEACHER_SECRET.to_string()),
        admin_identity: Some(ADMIN_IDENTITY.to_string()),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        rust_log: "error".to_string(),
    };

    let state = AppState::new(pool, config)
        .await
        .expect("Failed to build app state");
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address }
}

pub fn question(id: &str, correct: i64) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {}", id),
        options: vec!["first".to_string(), "second".to_string()],
        correct_answer_index: correct,
    }
}

/// Two questions with two options each; correct indices 0 and 1.
pub fn two_question_quiz(title: &str) -> QuizPayload {
    QuizPayload {
        title: title.to_string(),
        description: Some("Scenario quiz".to_string()),
        questions: vec![question("q1", 0), question("q2", 1)],
    }
}

pub fn submission(name: &str, course: &str, quiz_id: &str, picks: &[(&str, i64)]) -> SubmitAttemptRequest {
    SubmitAttemptRequest {
        student_name: name.to_string(),
        course: course.to_string(),
        quiz_id: quiz_id.to_string(),
        answers: picks.iter().map(|(q, i)| (q.to_string(), *i)).collect(),
    }
}

/// Logs in with the shared secret, creates and publishes the scenario quiz.
pub async fn published_quiz(app: &TestApp) -> String {
    let mut teacher = app.client();
    assert!(teacher.login_with_secret(TEACHER_SECRET).await.unwrap());
    let quiz_id = teacher.create_quiz(&two_question_quiz("Published")).await.unwrap();
    assert!(teacher.publish_quiz(&quiz_id).await.unwrap().success);
    quiz_id
}

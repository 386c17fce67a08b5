// src/routes.rs

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::credential::SECRET_HEADER,
    handlers::{auth, student, teacher},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Student routes need no credential.
/// * Teacher routes take the credential per request and run it through the gate
///   inside each handler, so nothing is cached server-side.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(SECRET_HEADER),
        ]);

    let student_routes = Router::new()
        .route("/students/resolve", post(student::resolve_student))
        .route("/quizzes/published", get(student::list_published))
        .route("/quizzes/{id}", get(student::get_quiz))
        .route("/attempts", post(student::submit_attempt))
        .route("/attempts/status", get(student::attempt_status));

    let teacher_routes = Router::new()
        .route(
            "/quizzes",
            get(teacher::list_own_quizzes).post(teacher::create_quiz),
        )
        .route("/quizzes/all", get(teacher::list_all_quizzes))
        .route("/quizzes/{id}", put(teacher::update_quiz))
        .route("/quizzes/{id}/publish", post(teacher::publish_quiz))
        .route("/quizzes/{id}/attempts", get(teacher::list_attempts))
        .route("/quizzes/{id}/stats", get(teacher::result_stats))
        .route("/quizzes/{id}/answers", get(teacher::answers_by_student))
        .route("/attempts", get(teacher::list_all_attempts))
        .route("/attempts/student", get(teacher::attempts_for_student));

    let auth_routes = Router::new()
        .route("/verify", post(auth::verify_secret))
        .route("/password", post(auth::change_secret))
        .route("/role", get(auth::get_role))
        .route("/admin", get(auth::is_admin))
        .route("/register", post(auth::register))
        .route("/roles/{identity}", put(auth::assign_role));

    Router::new()
        .nest("/api", student_routes)
        .nest("/api/teacher", teacher_routes)
        .nest("/api/auth", auth_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

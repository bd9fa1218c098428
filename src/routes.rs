// src/routes.rs

use axum::{
    Json, Router,
    http::Method,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, question, quiz, result},
    state::AppState,
};

/// API index, mirroring the mounted route groups.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Quiz Application API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth",
            "quizzes": "/api/quizzes",
            "questions": "/api/questions",
            "results": "/api/results"
        }
    }))
}

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quizzes, questions, results).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
///
/// Protected handlers declare a `Claims` argument; there is no separate
/// auth middleware layer.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route(
            "/{id}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route(
            "/{id}/questions",
            get(question::list_questions).post(question::add_question),
        )
        .route("/{id}/submit", post(result::submit_quiz))
        .route("/{id}/results", get(result::quiz_results));

    let question_routes = Router::new().route(
        "/{id}",
        put(question::update_question).delete(question::delete_question),
    );

    let result_routes = Router::new()
        .route("/my", get(result::my_results))
        .route("/{id}", get(result::get_result));

    Router::new()
        .route("/", get(root))
        .nest("/api/auth", auth_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// src/routes.rs

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{history, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Quiz generation and saved-test history under `/api`.
/// * Global middleware: request tracing and CORS. The browser client is
///   served from a different origin, so any origin is accepted.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate-questions", post(quiz::generate_questions))
        .route(
            "/api/history",
            get(history::list_history).post(history::save_test),
        )
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

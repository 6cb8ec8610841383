// src/handlers/history.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    history::{TestHistory, view::load_entries},
    models::saved_test::SavedTest,
};

/// Lists saved tests from the last 30 days, newest first, with per-question
/// correctness filled in.
pub async fn list_history(
    State(history): State<Arc<dyn TestHistory>>,
) -> Result<impl IntoResponse, AppError> {
    let entries = tokio::task::spawn_blocking(move || load_entries(history.as_ref()))
        .await
        .map_err(|e| AppError::Storage(e.to_string()))??;

    Ok(Json(entries))
}

/// Appends a completed test to the history.
///
/// The record is stored as sent; its score is not recomputed.
pub async fn save_test(
    State(history): State<Arc<dyn TestHistory>>,
    payload: Result<Json<SavedTest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(test) = payload?;
    let topic = test.topic.clone();

    tokio::task::spawn_blocking(move || history.append(test))
        .await
        .map_err(|e| AppError::Storage(e.to_string()))??;

    tracing::info!("Saved test on {:?}", topic);

    Ok((StatusCode::CREATED, Json(json!({ "message": "Test saved" }))))
}

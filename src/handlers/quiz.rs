// src/handlers/quiz.rs

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};

use crate::{
    error::AppError,
    models::{question::GenerateQuestionsResponse, quiz_request::QuizRequest},
    services::quiz::QuizService,
};

/// Generates a practice quiz for the submitted exam and topic.
///
/// * 400 when `exam` or `topic` is missing or blank.
/// * 500 with a generic message when the model call or extraction fails;
///   the cause is only logged.
pub async fn generate_questions(
    State(quiz): State<QuizService>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    tracing::info!("Generating quiz for exam {:?}, topic {:?}", req.exam, req.topic);

    let questions = quiz.generate_questions(&req).await?;

    Ok(Json(GenerateQuestionsResponse { questions }))
}

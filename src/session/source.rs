// src/session/source.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::DEFAULT_REQUEST_TIMEOUT_SECS,
    error::AppError,
    models::{question::Question, quiz_request::QuizRequest},
    services::quiz::QuizService,
};

/// Where a session gets its questions from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self, request: &QuizRequest) -> Result<Vec<Question>, AppError>;
}

/// In-process generation, no HTTP hop.
#[async_trait]
impl QuestionSource for QuizService {
    async fn fetch_questions(&self, request: &QuizRequest) -> Result<Vec<Question>, AppError> {
        self.generate_questions(request).await
    }
}

/// Calls a running server's `POST /api/generate-questions`.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    questions: Option<Vec<Question>>,
    error: Option<String>,
}

impl HttpQuestionSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch_questions(&self, request: &QuizRequest) -> Result<Vec<Question>, AppError> {
        let res = self
            .client
            .post(format!("{}/api/generate-questions", self.base_url))
            .json(request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        let reply: GenerateReply = res.json().await?;

        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "HTTP error! status: {} ({})",
                status,
                reply.error.unwrap_or_default()
            )));
        }

        reply
            .questions
            .ok_or_else(|| AppError::MalformedResponse("No questions returned.".to_string()))
    }
}

// src/services/quiz.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    extract::extract_questions,
    llm::TextGenerator,
    models::{question::Question, quiz_request::QuizRequest},
    prompt::PromptBuilder,
};

/// Request validation, prompt, model call and extraction in one place.
#[derive(Clone)]
pub struct QuizService {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
}

impl QuizService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::default(),
        }
    }

    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Generates a question list for `request`.
    ///
    /// * `Validation` when exam or topic is blank (the model is not called).
    /// * `Upstream` when the model call fails.
    /// * `MalformedResponse` when no question array can be recovered.
    pub async fn generate_questions(&self, request: &QuizRequest) -> Result<Vec<Question>, AppError> {
        request
            .validate()
            .map_err(|_| AppError::Validation("Exam and topic are required".to_string()))?;

        let prompt = self.prompts.build(request);
        let text = self.generator.generate(&prompt).await?;
        let questions = extract_questions(&text)?;

        tracing::info!(
            "Generated {} questions for exam {:?}, topic {:?}",
            questions.len(),
            request.exam,
            request.topic
        );

        Ok(questions)
    }
}

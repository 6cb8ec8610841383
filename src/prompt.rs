// src/prompt.rs

//! Turns a quiz request into the instruction text sent to the model.
//!
//! User text is embedded as-is. Nothing here guards against a topic that
//! reads like an instruction (prompt injection is not mitigated).

use crate::{config::QUESTIONS_PER_QUIZ, models::quiz_request::QuizRequest};

/// Optional request fields that add a sentence to the prompt, in the
/// order the sentences are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    Language,
    Difficulty,
    Subjects,
    AdditionalInfo,
}

impl PromptField {
    pub const ORDER: [PromptField; 4] = [
        PromptField::Language,
        PromptField::Difficulty,
        PromptField::Subjects,
        PromptField::AdditionalInfo,
    ];

    /// The trimmed value of this field, `None` when absent or blank.
    pub fn value<'a>(&self, request: &'a QuizRequest) -> Option<&'a str> {
        let raw = match self {
            PromptField::Language => request.language.as_deref(),
            PromptField::Difficulty => request.difficulty.as_deref(),
            PromptField::Subjects => request.subjects.as_deref(),
            PromptField::AdditionalInfo => request.additional_info.as_deref(),
        };
        raw.map(str::trim).filter(|v| !v.is_empty())
    }

    fn sentence(&self, value: &str) -> String {
        match self {
            PromptField::Language => format!(
                "Write every question, option and explanation in {}.",
                value
            ),
            PromptField::Difficulty => format!("The difficulty level of the questions must be {}.", value),
            PromptField::Subjects => format!("Focus the questions on the following subjects: {}.", value),
            PromptField::AdditionalInfo => format!("Also take into account these additional details: {}", value),
        }
    }
}

/// Builds prompts for a fixed number of questions.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    question_count: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            question_count: QUESTIONS_PER_QUIZ,
        }
    }
}

impl PromptBuilder {
    pub fn with_question_count(question_count: usize) -> Self {
        Self { question_count }
    }

    pub fn build(&self, request: &QuizRequest) -> String {
        let mut prompt = format!(
            "You are a quiz generator. Your task is to generate {count} multiple-choice questions \
             for the \"{exam}\" exam on the topic \"{topic}\".\n\
             \n\
             You must respond with only a valid JSON array of exactly {count} objects. Do not include any text, \
             markdown formatting, or code fences like ```json before or after the array.\n\
             \n\
             Each object in the array must have the following keys: \"id\", \"question\", \
             \"options\", \"correct_answer\", and \"explanation\". The \"options\" key must \
             be an array of strings.",
            count = self.question_count,
            exam = request.exam,
            topic = request.topic,
        );

        for field in PromptField::ORDER {
            if let Some(value) = field.value(request) {
                prompt.push('\n');
                prompt.push_str(&field.sentence(value));
            }
        }

        prompt
    }
}

/// Shorthand for `PromptBuilder::default().build(request)`.
pub fn build_prompt(request: &QuizRequest) -> String {
    PromptBuilder::default().build(request)
}

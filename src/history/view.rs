// src/history/view.rs

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::{
    error::AppError,
    history::store::TestHistory,
    models::{
        question::Question,
        saved_test::{SavedTest, UserAnswers},
    },
};

/// Shown in place of a missing answer.
pub const NOT_ANSWERED: &str = "Not answered";

/// Per-question row of a past test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub id: i64,
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl QuestionOutcome {
    pub fn for_question(question: &Question, answers: &UserAnswers) -> Self {
        let user_answer = answers.get(&question.id).cloned();
        Self {
            id: question.id,
            question: question.question.clone(),
            is_correct: question.is_answered_correctly(user_answer.as_deref()),
            user_answer,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        }
    }

    /// The answer as displayed, `NOT_ANSWERED` when the question was skipped.
    pub fn answer_label(&self) -> &str {
        self.user_answer.as_deref().unwrap_or(NOT_ANSWERED)
    }
}

/// One saved test as listed on the history screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub topic: String,
    pub exam: String,
    pub language: String,
    /// As stored at submission. Not checked against `outcomes`.
    pub score: usize,
    pub question_count: usize,
    pub timestamp: i64,
    pub date: String,
    pub outcomes: Vec<QuestionOutcome>,
}

impl HistoryEntry {
    pub fn from_saved(test: &SavedTest) -> Self {
        let outcomes = test
            .questions
            .iter()
            .map(|q| QuestionOutcome::for_question(q, &test.user_answers))
            .collect();

        Self {
            topic: test.topic.clone(),
            exam: test.exam.clone(),
            language: test.language.clone(),
            score: test.score,
            question_count: test.questions.len(),
            timestamp: test.timestamp,
            date: format_date(test.timestamp),
            outcomes,
        }
    }

    /// "Test on \"<topic>\" - Score: s/n"
    pub fn summary(&self) -> String {
        format!(
            "Test on \"{}\" - Score: {}/{}",
            self.topic, self.score, self.question_count
        )
    }
}

/// Local calendar date of an epoch-millisecond timestamp.
pub fn format_date(timestamp: i64) -> String {
    match Local.timestamp_millis_opt(timestamp).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "unknown date".to_string(),
    }
}

/// Newest-first entries built from an oldest-first test list.
pub fn entries_newest_first(tests: &[SavedTest]) -> Vec<HistoryEntry> {
    tests.iter().rev().map(HistoryEntry::from_saved).collect()
}

/// Reads the retained history once and renders it newest first.
pub fn load_entries(history: &dyn TestHistory) -> Result<Vec<HistoryEntry>, AppError> {
    let tests = history.load()?;
    Ok(entries_newest_first(&tests))
}

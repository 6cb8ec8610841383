// src/session/mod.rs

//! Quiz lifecycle: idle → generating → taking → submitted → reviewing, and
//! back to idle on "start new test".

pub mod app;
pub mod source;

use std::{fmt, sync::Arc};

use serde::Serialize;
use validator::Validate;

use crate::{
    error::AppError,
    history::{store::now_millis, view::QuestionOutcome, TestHistory},
    models::{
        question::Question,
        quiz_request::QuizRequest,
        saved_test::{score_answers, SavedTest, UserAnswers},
    },
};

pub use source::{HttpQuestionSource, QuestionSource};

/// The one message shown for any failed generation, whatever the cause.
pub const GENERATION_RETRY_MESSAGE: &str = "Failed to generate questions. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Idle,
    Generating,
    Taking,
    Submitted,
    Reviewing,
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizStatus::Idle => "idle",
            QuizStatus::Generating => "generating",
            QuizStatus::Taking => "taking",
            QuizStatus::Submitted => "submitted",
            QuizStatus::Reviewing => "reviewing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SubmitRequest,
    GenerationFinished,
    SelectOption,
    SubmitTest,
    Review,
    StartNew,
}

#[derive(Debug)]
pub enum SessionError {
    /// The event is not allowed in the current state. Nothing changed.
    InvalidTransition { from: QuizStatus, event: SessionEvent },

    /// Exam or topic was blank; the session stays idle.
    MissingField,

    /// The finished test could not be saved; the session stays in `taking`.
    Storage(AppError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidTransition { from, event } => {
                write!(f, "{:?} is not allowed while {}", event, from)
            }
            SessionError::MissingField => f.write_str("exam and topic are required"),
            SessionError::Storage(e) => write!(f, "could not save test: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

/// One quiz run. Owns the in-progress questions and answers.
pub struct QuizSession {
    status: QuizStatus,
    request: QuizRequest,
    questions: Vec<Question>,
    user_answers: UserAnswers,
    score: usize,
    error: Option<String>,
    submitted_at: Option<i64>,
    history: Arc<dyn TestHistory>,
}

impl QuizSession {
    pub fn new(history: Arc<dyn TestHistory>) -> Self {
        Self {
            status: QuizStatus::Idle,
            request: QuizRequest::default(),
            questions: Vec::new(),
            user_answers: UserAnswers::new(),
            score: 0,
            error: None,
            submitted_at: None,
            history,
        }
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn request(&self) -> &QuizRequest {
        &self.request
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn user_answers(&self) -> &UserAnswers {
        &self.user_answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submitted_at(&self) -> Option<i64> {
        self.submitted_at
    }

    /// Whether the generate control should be enabled for `request`.
    pub fn can_request(&self, request: &QuizRequest) -> bool {
        self.status == QuizStatus::Idle && request.validate().is_ok()
    }

    fn ensure(&self, allowed: &[QuizStatus], event: SessionEvent) -> Result<(), SessionError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.status,
                event,
            })
        }
    }

    /// `idle → generating`. Rejected (staying idle) when exam or topic is blank.
    pub fn begin_generation(&mut self, request: QuizRequest) -> Result<(), SessionError> {
        self.ensure(&[QuizStatus::Idle], SessionEvent::SubmitRequest)?;
        request.validate().map_err(|_| SessionError::MissingField)?;

        self.request = request;
        self.error = None;
        self.questions.clear();
        self.user_answers.clear();
        self.score = 0;
        self.submitted_at = None;
        self.status = QuizStatus::Generating;
        Ok(())
    }

    /// `generating → taking` on a non-empty list, `generating → idle` otherwise.
    pub fn finish_generation(
        &mut self,
        outcome: Result<Vec<Question>, AppError>,
    ) -> Result<(), SessionError> {
        self.ensure(&[QuizStatus::Generating], SessionEvent::GenerationFinished)?;

        match outcome {
            Ok(questions) if !questions.is_empty() => {
                tracing::info!("Quiz ready with {} questions", questions.len());
                self.questions = questions;
                self.user_answers.clear();
                self.status = QuizStatus::Taking;
            }
            Ok(_) => self.fail_generation("no questions returned".to_string()),
            Err(e) => self.fail_generation(e.to_string()),
        }
        Ok(())
    }

    fn fail_generation(&mut self, cause: String) {
        tracing::warn!("Question generation failed: {}", cause);
        self.questions.clear();
        self.user_answers.clear();
        self.score = 0;
        self.error = Some(GENERATION_RETRY_MESSAGE.to_string());
        self.status = QuizStatus::Idle;
    }

    /// Runs a whole generation round against `source`.
    ///
    /// The session is `generating` for the duration of the call, which is
    /// what keeps a second request from starting.
    pub async fn generate(
        &mut self,
        request: QuizRequest,
        source: &dyn QuestionSource,
    ) -> Result<(), SessionError> {
        self.begin_generation(request)?;
        let outcome = source.fetch_questions(&self.request).await;
        self.finish_generation(outcome)
    }

    /// Records (or changes) the answer for `question_id`. The id is not
    /// checked against the question list.
    pub fn select_option(
        &mut self,
        question_id: i64,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure(&[QuizStatus::Taking], SessionEvent::SelectOption)?;
        self.user_answers.insert(question_id, option.into());
        Ok(())
    }

    /// `taking → submitted`: scores the quiz and appends it to the history.
    pub fn submit_test(&mut self) -> Result<usize, SessionError> {
        self.submit_test_at(now_millis())
    }

    /// As `submit_test`, stamping the saved test with `now` (epoch ms).
    pub fn submit_test_at(&mut self, now: i64) -> Result<usize, SessionError> {
        self.ensure(&[QuizStatus::Taking], SessionEvent::SubmitTest)?;

        let score = score_answers(&self.questions, &self.user_answers);
        let test = SavedTest {
            topic: self.request.topic.clone(),
            exam: self.request.exam.clone(),
            language: self.request.language_or_empty().to_string(),
            questions: self.questions.clone(),
            user_answers: self.user_answers.clone(),
            score,
            timestamp: now,
        };

        self.history.append(test).map_err(SessionError::Storage)?;

        tracing::info!("Test submitted: {}/{}", score, self.questions.len());
        self.score = score;
        self.submitted_at = Some(now);
        self.status = QuizStatus::Submitted;
        Ok(score)
    }

    /// `submitted | reviewing → reviewing`. Never touches score or history.
    pub fn review(&mut self) -> Result<(), SessionError> {
        self.ensure(
            &[QuizStatus::Submitted, QuizStatus::Reviewing],
            SessionEvent::Review,
        )?;
        self.status = QuizStatus::Reviewing;
        Ok(())
    }

    /// Back to an empty `idle` form.
    pub fn start_new(&mut self) -> Result<(), SessionError> {
        self.ensure(
            &[QuizStatus::Taking, QuizStatus::Submitted, QuizStatus::Reviewing],
            SessionEvent::StartNew,
        )?;
        self.request = QuizRequest::default();
        self.questions.clear();
        self.user_answers.clear();
        self.score = 0;
        self.error = None;
        self.submitted_at = None;
        self.status = QuizStatus::Idle;
        Ok(())
    }

    /// Per-question correctness for the review screen.
    pub fn outcomes(&self) -> Vec<QuestionOutcome> {
        self.questions
            .iter()
            .map(|q| QuestionOutcome::for_question(q, &self.user_answers))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::history::{BlobHistory, MemoryBlobStore};

    struct FixedSource(Result<Vec<Question>, String>);

    #[async_trait]
    impl QuestionSource for FixedSource {
        async fn fetch_questions(&self, _request: &QuizRequest) -> Result<Vec<Question>, AppError> {
            self.0.clone().map_err(AppError::Upstream)
        }
    }

    /// History whose writes always fail.
    struct BrokenHistory;

    impl TestHistory for BrokenHistory {
        fn load(&self) -> Result<Vec<SavedTest>, AppError> {
            Ok(Vec::new())
        }

        fn append(&self, _test: SavedTest) -> Result<(), AppError> {
            Err(AppError::Storage("disk full".to_string()))
        }
    }

    fn questions() -> Vec<Question> {
        ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, correct)| Question {
                id: i as i64 + 1,
                question: format!("Question {}", i + 1),
                options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                correct_answer: correct.to_string(),
                explanation: None,
            })
            .collect()
    }

    fn session() -> (QuizSession, Arc<BlobHistory<MemoryBlobStore>>) {
        let history = Arc::new(BlobHistory::new(MemoryBlobStore::new()));
        (QuizSession::new(history.clone()), history)
    }

    fn taking_session() -> (QuizSession, Arc<BlobHistory<MemoryBlobStore>>) {
        let (mut s, history) = session();
        s.begin_generation(QuizRequest::new("GMAT", "Algebra")).unwrap();
        s.finish_generation(Ok(questions())).unwrap();
        (s, history)
    }

    #[tokio::test]
    async fn test_end_to_end_quiz() {
        let (mut s, history) = session();
        let mut request = QuizRequest::new("GMAT", "Algebra");
        request.language = Some("English".to_string());

        s.generate(request, &FixedSource(Ok(questions()))).await.unwrap();
        assert_eq!(s.status(), QuizStatus::Taking);
        assert_eq!(s.questions().len(), 3);
        assert!(s.user_answers().is_empty());

        s.select_option(1, "A").unwrap();
        s.select_option(2, "B").unwrap();
        s.select_option(3, "A").unwrap();

        let score = s.submit_test().unwrap();
        assert_eq!(score, 2);
        assert_eq!(s.score(), 2);
        assert_eq!(s.status(), QuizStatus::Submitted);

        let saved = history.load().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].questions.len(), 3);
        assert_eq!(saved[0].score, 2);
        assert_eq!(saved[0].exam, "GMAT");
        assert_eq!(saved[0].language, "English");
        assert_eq!(Some(saved[0].timestamp), s.submitted_at());
    }

    #[test]
    fn test_blank_fields_keep_session_idle() {
        let (mut s, _) = session();
        let err = s.begin_generation(QuizRequest::new("GMAT", "")).unwrap_err();
        assert!(matches!(err, SessionError::MissingField));
        assert_eq!(s.status(), QuizStatus::Idle);
        assert!(!s.can_request(&QuizRequest::new("", "Algebra")));
        assert!(s.can_request(&QuizRequest::new("GMAT", "Algebra")));
    }

    #[test]
    fn test_second_request_while_generating_is_rejected() {
        let (mut s, _) = session();
        s.begin_generation(QuizRequest::new("GMAT", "Algebra")).unwrap();

        assert!(!s.can_request(&QuizRequest::new("GMAT", "Geometry")));
        let err = s.begin_generation(QuizRequest::new("GMAT", "Geometry")).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition { from: QuizStatus::Generating, event: SessionEvent::SubmitRequest }
        ));
        assert_eq!(s.request().topic, "Algebra");
    }

    #[tokio::test]
    async fn test_generation_failure_returns_to_idle() {
        let (mut s, _) = session();
        s.generate(QuizRequest::new("GMAT", "Algebra"), &FixedSource(Err("boom".to_string())))
            .await
            .unwrap();

        assert_eq!(s.status(), QuizStatus::Idle);
        assert_eq!(s.error(), Some(GENERATION_RETRY_MESSAGE));
        assert!(s.questions().is_empty());
    }

    #[test]
    fn test_empty_question_list_is_a_failure() {
        let (mut s, _) = session();
        s.begin_generation(QuizRequest::new("GMAT", "Algebra")).unwrap();
        s.finish_generation(Ok(Vec::new())).unwrap();
        assert_eq!(s.status(), QuizStatus::Idle);
        assert!(s.error().is_some());
    }

    #[test]
    fn test_new_request_clears_previous_error() {
        let (mut s, _) = session();
        s.begin_generation(QuizRequest::new("GMAT", "Algebra")).unwrap();
        s.finish_generation(Err(AppError::MalformedResponse("x".to_string()))).unwrap();
        assert!(s.error().is_some());

        s.begin_generation(QuizRequest::new("GMAT", "Algebra")).unwrap();
        assert_eq!(s.error(), None);
    }

    #[test]
    fn test_selection_can_change_before_submit() {
        let (mut s, _) = taking_session();
        s.select_option(1, "B").unwrap();
        s.select_option(1, "A").unwrap();
        s.select_option(42, "Z").unwrap();

        assert_eq!(s.user_answers().get(&1).map(String::as_str), Some("A"));
        assert_eq!(s.user_answers().len(), 2);
        assert_eq!(s.submit_test_at(1_000).unwrap(), 1);
    }

    #[test]
    fn test_review_is_idempotent() {
        let (mut s, history) = taking_session();
        s.select_option(1, "A").unwrap();
        s.select_option(2, "B").unwrap();
        s.submit_test().unwrap();

        s.review().unwrap();
        s.review().unwrap();

        assert_eq!(s.status(), QuizStatus::Reviewing);
        assert_eq!(s.score(), 2);
        assert_eq!(history.load().unwrap().len(), 1);
    }

    #[test]
    fn test_submit_twice_is_rejected() {
        let (mut s, history) = taking_session();
        s.submit_test().unwrap();
        assert!(matches!(
            s.submit_test(),
            Err(SessionError::InvalidTransition { from: QuizStatus::Submitted, .. })
        ));
        s.review().unwrap();
        assert!(s.submit_test().is_err());
        assert_eq!(history.load().unwrap().len(), 1);
    }

    #[test]
    fn test_answers_locked_after_submit() {
        let (mut s, _) = taking_session();
        s.submit_test().unwrap();
        assert!(s.select_option(1, "A").is_err());
        assert!(s.user_answers().is_empty());
    }

    #[test]
    fn test_review_before_submit_is_rejected() {
        let (mut s, _) = taking_session();
        assert!(s.review().is_err());
        assert_eq!(s.status(), QuizStatus::Taking);
    }

    #[test]
    fn test_start_new_clears_everything() {
        let (mut s, history) = taking_session();
        s.select_option(1, "A").unwrap();
        s.submit_test().unwrap();
        s.review().unwrap();

        s.start_new().unwrap();

        assert_eq!(s.status(), QuizStatus::Idle);
        assert_eq!(s.request(), &QuizRequest::default());
        assert!(s.questions().is_empty());
        assert!(s.user_answers().is_empty());
        assert_eq!(s.score(), 0);
        assert_eq!(s.error(), None);
        // The saved record is untouched.
        assert_eq!(history.load().unwrap()[0].score, 1);
    }

    #[test]
    fn test_start_new_not_allowed_while_idle_or_generating() {
        let (mut s, _) = session();
        assert!(s.start_new().is_err());
        s.begin_generation(QuizRequest::new("GMAT", "Algebra")).unwrap();
        assert!(s.start_new().is_err());
        assert_eq!(s.status(), QuizStatus::Generating);
    }

    #[test]
    fn test_storage_failure_keeps_session_taking() {
        let mut s = QuizSession::new(Arc::new(BrokenHistory));
        s.begin_generation(QuizRequest::new("GMAT", "Algebra")).unwrap();
        s.finish_generation(Ok(questions())).unwrap();
        s.select_option(1, "A").unwrap();

        assert!(matches!(s.submit_test(), Err(SessionError::Storage(_))));
        assert_eq!(s.status(), QuizStatus::Taking);
        assert_eq!(s.user_answers().len(), 1);
    }

    #[test]
    fn test_outcomes_mark_each_question() {
        let (mut s, _) = taking_session();
        s.select_option(1, "A").unwrap();
        s.select_option(2, "C").unwrap();

        let outcomes = s.outcomes();
        assert!(outcomes[0].is_correct);
        assert!(!outcomes[1].is_correct);
        assert_eq!(outcomes[2].user_answer, None);
    }
}

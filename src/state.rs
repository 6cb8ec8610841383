use std::sync::Arc;

use axum::extract::FromRef;

use crate::{history::TestHistory, services::quiz::QuizService};

#[derive(Clone)]
pub struct AppState {
    pub quiz: QuizService,
    pub history: Arc<dyn TestHistory>,
}

impl FromRef<AppState> for QuizService {
    fn from_ref(state: &AppState) -> Self {
        state.quiz.clone()
    }
}

impl FromRef<AppState> for Arc<dyn TestHistory> {
    fn from_ref(state: &AppState) -> Self {
        state.history.clone()
    }
}

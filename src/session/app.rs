// src/session/app.rs

/// Top-level screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    /// Welcome screen. There is no authentication behind it.
    #[default]
    Login,
    Main,
    History,
}

/// Screen navigation: `login → main ↔ history`.
#[derive(Debug, Default)]
pub struct App {
    view: AppView,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppView {
        self.view
    }

    pub fn continue_to_main(&mut self) {
        if self.view == AppView::Login {
            self.view = AppView::Main;
        }
    }

    pub fn show_history(&mut self) {
        if self.view == AppView::Main {
            self.view = AppView::History;
        }
    }

    pub fn back(&mut self) {
        if self.view == AppView::History {
            self.view = AppView::Main;
        }
    }
}

// src/lib.rs

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod history;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;

// Re-export specific items for convenience if needed
pub use routes::create_router;

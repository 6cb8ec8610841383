// src/handlers/mod.rs

pub mod history;
pub mod quiz;

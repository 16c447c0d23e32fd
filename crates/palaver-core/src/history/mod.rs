//! Chat history persistence abstractions for Palaver.
//!
//! Defines the `HistoryRepository` port that the infrastructure layer
//! implements, and the `HistoryService` that validates input in front of it.

pub mod repository;
pub mod service;

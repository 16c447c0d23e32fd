//! Business logic and port trait definitions for Palaver.
//!
//! This crate defines the "ports" (`CompletionUpstream`, `HistoryRepository`)
//! that the infrastructure layer implements. It depends only on
//! `palaver-types` -- never on `palaver-infra` or any database/IO crate.

pub mod history;
pub mod relay;

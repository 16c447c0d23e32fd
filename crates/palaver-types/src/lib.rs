//! Shared domain types for Palaver.
//!
//! Chat history records, the completion relay result, service configuration
//! and the error types used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, secrecy.

pub mod chat;
pub mod completion;
pub mod config;
pub mod error;

//! Infrastructure layer for Palaver.
//!
//! Contains implementations of the port traits defined in `palaver-core`:
//! SQLite chat history storage and the HTTP upstream client, plus the
//! configuration loader.

pub mod config;
pub mod sqlite;
pub mod upstream;

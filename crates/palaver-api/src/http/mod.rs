//! HTTP/REST API layer for Palaver.
//!
//! Axum-based REST API at `/api/v1/` with flat JSON bodies and permissive
//! CORS.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;

//! Upstream completion API adapters.

pub mod http;

pub use http::HttpUpstream;

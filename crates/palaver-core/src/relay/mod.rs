//! Completion relay: the upstream port, reply normalization and the service
//! that ties them together.

pub mod normalize;
pub mod service;
pub mod upstream;

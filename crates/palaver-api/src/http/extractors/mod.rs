//! Request extractors shared by the handlers.

pub mod json_body;
pub mod request_id;

pub use json_body::{JsonBody, parse_body};
pub use request_id::{REQUEST_ID_HEADER, RequestId};

//! Upstream reply normalization.
//!
//! The upstream completion API has returned at least three incompatible
//! payload layouts over time. Callers only ever see a flat string; this module
//! is the single place that knows about the layouts:
//!
//! | Shape      | Payload                                        | Content                  |
//! |------------|------------------------------------------------|--------------------------|
//! | `Rich`     | `{"response": {"ai_response": {"content": s}}}` | `s` (missing -> `""`)    |
//! | `Flat`     | `{"response": "s"}`                             | `s`                      |
//! | `Fallback` | `{"response": <anything else>}`                 | stringified `response`   |
//! | `Unknown`  | no `response` key                               | stringified payload      |
//!
//! A rich reply whose `ai_response` is not an object is rejected as malformed.
//! Stringified objects keep the upstream's key order.

use std::io;

use palaver_types::error::RelayError;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;

/// The layout an upstream payload was recognised as, borrowing from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplyShape<'a> {
    /// `response.ai_response` exists; holds the `ai_response` value.
    Rich(&'a Value),
    /// `response` is a plain string.
    Flat(&'a str),
    /// `response` is present but neither of the above.
    Fallback(&'a Value),
    /// No `response` key at all; holds the whole payload.
    Unknown(&'a Value),
}

impl<'a> ReplyShape<'a> {
    /// Recognise the layout of an upstream payload.
    pub fn classify(payload: &'a Value) -> Self {
        match payload.get("response") {
            Some(response @ Value::Object(inner)) => match inner.get("ai_response") {
                Some(ai_response) => ReplyShape::Rich(ai_response),
                None => ReplyShape::Fallback(response),
            },
            Some(Value::String(text)) => ReplyShape::Flat(text),
            Some(other) => ReplyShape::Fallback(other),
            None => ReplyShape::Unknown(payload),
        }
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ReplyShape::Rich(_) => "rich",
            ReplyShape::Flat(_) => "flat",
            ReplyShape::Fallback(_) => "fallback",
            ReplyShape::Unknown(_) => "unknown",
        }
    }

    /// Flatten the recognised layout into reply text.
    ///
    /// Fails with [`RelayError::Internal`] when `ai_response` is present but
    /// is not an object.
    pub fn into_content(self) -> Result<String, RelayError> {
        let content = match self {
            ReplyShape::Rich(Value::Object(ai_response)) => match ai_response.get("content") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => text.clone(),
                Some(other) => stringify(other),
            },
            ReplyShape::Rich(other) => {
                return Err(RelayError::Internal(format!(
                    "malformed upstream reply: ai_response is {}, expected an object",
                    kind_of(other)
                )));
            }
            ReplyShape::Flat(text) => text.to_string(),
            ReplyShape::Fallback(value) | ReplyShape::Unknown(value) => stringify(value),
        };
        Ok(content)
    }
}

/// Normalize an upstream payload into a flat reply string.
pub fn normalize_reply(payload: &Value) -> Result<String, RelayError> {
    ReplyShape::classify(payload).into_content()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Render a JSON value on one line with a space after `:` and `,`.
///
/// `{"x": 1, "y": [1, 2]}` rather than serde_json's `{"x":1,"y":[1,2]}`.
pub fn stringify(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

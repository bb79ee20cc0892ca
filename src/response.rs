use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AccountError, Result};

/// Payload is the decoded body of a successful request or upload.
/// An empty body is reported as `NoContent` instead of a JSON parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The server answered with an empty body
    NoContent,
    /// The server answered with a JSON document
    Json(Value),
}

impl Payload {
    /// Decode a response body. Empty bodies are `NoContent`; anything else
    /// must be valid JSON.
    pub fn from_body(body: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        if body.is_empty() {
            return Ok(Payload::NoContent);
        }
        serde_json::from_slice(body).map(Payload::Json)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::NoContent)
    }

    /// Get the raw JSON value, if any
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Payload::NoContent => None,
            Payload::Json(value) => Some(value),
        }
    }

    /// Consume the payload, mapping `NoContent` to JSON `null`
    pub fn into_value(self) -> Value {
        match self {
            Payload::NoContent => Value::Null,
            Payload::Json(value) => value,
        }
    }

    /// Deserialize the payload into the target type
    pub fn apply<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self.raw().cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| AccountError::Parse(format!("unexpected response shape: {}", e)))
    }

    /// Deserialize a JSON array; no content and `null` give an empty list
    pub fn into_list<T>(self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        match self.into_value() {
            Value::Null => Ok(Vec::new()),
            value => serde_json::from_value(value)
                .map_err(|e| AccountError::Parse(format!("expected a list: {}", e))),
        }
    }

    /// Get a value by a slash-separated path.
    /// For example, "0/id" reads the "id" field of the first list element.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = self.raw()?;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }
}

//! Request descriptors supplied by concrete API clients.
//!
//! # Design
//! A descriptor says what to call, not how: the executor decides how the
//! URL, headers and body are composed from it. The body is an opaque JSON
//! value so the executor stays agnostic to payload shape; callers with typed
//! payloads go through `with_json_body`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A single header or query parameter. Repeated keys are all sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One logical request as described by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub path: String,
    /// When set, `path` is used verbatim and no default headers, caller
    /// headers or query parameters are attached.
    #[serde(default)]
    pub absolute_path: bool,
    #[serde(default)]
    pub headers: Vec<Attribute>,
    #[serde(default)]
    pub query_params: Vec<Attribute>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// A relative request, resolved against the configured `host:port`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// A request whose `path` is already a complete URL.
    pub fn absolute(url: impl Into<String>) -> Self {
        Self {
            path: url.into(),
            absolute_path: true,
            ..Self::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Attribute::new(key, value));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push(Attribute::new(key, value));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serializable value as the body.
    pub fn with_json_body<T: Serialize>(self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.with_body(value))
    }
}

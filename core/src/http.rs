//! HTTP transport types exchanged with a `Transport`.
//!
//! # Design
//! Requests and responses are plain data. `RequestExecutor` builds an
//! `HttpRequest` from a descriptor and hands it to whatever transport it was
//! constructed with; the transport performs the I/O and answers with an
//! `HttpResponse` or a `TransportFailure`. Keeping the I/O on the far side of
//! this boundary is what lets the executor be tested with a scripted
//! transport and no sockets.
//!
//! Headers and query parameters are ordered `Vec`s of pairs rather than maps:
//! duplicate keys are legal and every value is sent.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the method forwards the descriptor body at all.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON text that has already been encoded by the executor. POST bodies
    /// always take this form.
    Text(String),

    /// A JSON value forwarded as-is; the transport encodes it when sending.
    /// PUT and PATCH bodies take this form.
    Json(Value),
}

/// An HTTP request described as plain data.
///
/// `url` is fully resolved: either `host:port` + path, or the caller's
/// absolute path untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Payload>,
}

impl HttpRequest {
    /// All values sent for header `name`, in order. Header names compare
    /// case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

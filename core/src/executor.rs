//! Turns request descriptors into outbound calls wrapped in retry and timeout.
//!
//! # Design
//! `RequestExecutor` is the base that concrete API clients hold. Each verb is
//! split into `build` (validation and composition, no I/O) and `dispatch`
//! (transport call, retries, deadline), mirroring the request/response
//! boundary in `http`.
//!
//! Composition rules:
//! - relative paths are prefixed with `host:port`, get the default
//!   `Content-Type: application/json` header followed by every caller header,
//!   and every caller query parameter, all appended in order;
//! - absolute paths are sent verbatim with no headers and no query;
//! - POST bodies are encoded to JSON text here, PUT and PATCH bodies are
//!   forwarded as values, GET and DELETE send no body.
//!
//! The retry loop runs inside a single `tokio::time::timeout`, so the
//! deadline covers every attempt and every delay between attempts.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Payload};
use crate::retry::RetryPolicy;
use crate::transport::Transport;
use crate::types::{Attribute, RequestDescriptor};

const DEFAULT_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

/// Shared request base for API clients targeting one backend.
///
/// Holds no per-request state; concurrent calls each build their own
/// request and own their own retry loop.
#[derive(Debug, Clone)]
pub struct RequestExecutor<T> {
    transport: T,
    config: ClientConfig,
    base_url: String,
    retry: RetryPolicy,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let base_url = config.base_url();
        Self {
            transport,
            config,
            base_url,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, ApiError> {
        self.execute(HttpMethod::Get, descriptor).await
    }

    pub async fn post(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, ApiError> {
        self.execute(HttpMethod::Post, descriptor).await
    }

    pub async fn put(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, ApiError> {
        self.execute(HttpMethod::Put, descriptor).await
    }

    pub async fn patch(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, ApiError> {
        self.execute(HttpMethod::Patch, descriptor).await
    }

    pub async fn delete(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, ApiError> {
        self.execute(HttpMethod::Delete, descriptor).await
    }

    /// Build and dispatch in one step.
    pub async fn execute(
        &self,
        method: HttpMethod,
        descriptor: &RequestDescriptor,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build(method, descriptor)?;
        self.dispatch(request).await
    }

    /// Resolve a descriptor into the request that will be sent.
    pub fn build(
        &self,
        method: HttpMethod,
        descriptor: &RequestDescriptor,
    ) -> Result<HttpRequest, ApiError> {
        if descriptor.path.is_empty() {
            return Err(ApiError::MissingPath { method });
        }

        let body = encode_body(method, descriptor.body.as_ref())?;

        if descriptor.absolute_path {
            return Ok(HttpRequest {
                method,
                url: descriptor.path.clone(),
                headers: Vec::new(),
                query: Vec::new(),
                body,
            });
        }

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.base_url, descriptor.path),
            headers: request_headers(&descriptor.headers),
            query: query_params(&descriptor.query_params),
            body,
        })
    }

    /// Send a built request, retrying transient failures until the configured
    /// timeout elapses.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let timeout = self.config.default_timeout();
        tracing::debug!(method = %request.method, url = %request.url, "Dispatching request");

        let attempts = self.retry.run(|| self.transport.send(request.clone()));

        match tokio::time::timeout(timeout, attempts).await {
            Ok(Ok(response)) => {
                tracing::debug!(status = response.status, url = %request.url, "Request succeeded");
                Ok(response)
            }
            Ok(Err(failure)) => {
                tracing::debug!(status = failure.status, url = %request.url, "Request failed");
                Err(ApiError::Transport(failure))
            }
            Err(_) => {
                tracing::debug!(timeout_ms = timeout.as_millis() as u64, url = %request.url, "Request timed out");
                Err(ApiError::Timeout { after: timeout })
            }
        }
    }
}

/// POST encodes to JSON text; PUT and PATCH pass the value through.
fn encode_body(method: HttpMethod, body: Option<&Value>) -> Result<Option<Payload>, ApiError> {
    match method {
        HttpMethod::Post => {
            let text = serde_json::to_string(body.unwrap_or(&Value::Null))
                .map_err(|e| ApiError::Serialization(e.to_string()))?;
            Ok(Some(Payload::Text(text)))
        }
        HttpMethod::Put | HttpMethod::Patch => Ok(body.cloned().map(Payload::Json)),
        HttpMethod::Get | HttpMethod::Delete => Ok(None),
    }
}

fn request_headers(attributes: &[Attribute]) -> Vec<(String, String)> {
    DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain(attributes.iter().map(|a| (a.key.clone(), a.value.clone())))
        .collect()
}

fn query_params(attributes: &[Attribute]) -> Vec<(String, String)> {
    attributes.iter().map(|a| (a.key.clone(), a.value.clone())).collect()
}

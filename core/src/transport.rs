//! The outbound seam: anything that can perform an `HttpRequest`.
//!
//! # Contract
//! - A 2xx response is returned as `Ok(HttpResponse)`.
//! - Any other response is returned as `Err(TransportFailure)` carrying that
//!   status and the response body.
//! - When no response arrived at all (refused, DNS, reset) the failure has
//!   `status == 0`.
//! - A transport may report a failure with a status below 400 (an unfollowed
//!   redirect, a body that could not be read). Those are the failures the
//!   executor retries.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// A failed attempt as reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {body}")]
pub struct TransportFailure {
    /// Response status, or 0 when the host never answered.
    pub status: u16,
    pub body: String,
}

impl TransportFailure {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A failure where no response was received.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::new(0, reason)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        (**self).send(request).await
    }
}

//! Error types for the request layer.
//!
//! # Design
//! `MissingPath` is a caller bug and is raised before anything is sent.
//! `Transport` carries the failure exactly as the transport reported it;
//! only failures the retry classifier rejects ever reach the caller this
//! way. `Timeout` supersedes whatever retryable failure was in flight when
//! the deadline passed.

use std::time::Duration;

use thiserror::Error;

use crate::http::HttpMethod;
use crate::transport::TransportFailure;

/// Errors returned by `RequestExecutor`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The descriptor had an empty path. Never retried, never timed.
    #[error("Request::{method}::Path is a required parameter")]
    MissingPath { method: HttpMethod },

    /// A non-retryable failure reported by the transport.
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    /// The request, including every retry and delay, outlived the configured
    /// timeout.
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The request body could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Status of the underlying transport failure, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(failure) => Some(failure.status),
            _ => None,
        }
    }
}

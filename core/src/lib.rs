//! Outbound request layer shared by API clients.
//!
//! # Overview
//! Concrete API clients describe each call with a `RequestDescriptor` and hand
//! it to a `RequestExecutor`, which resolves the URL, composes headers and
//! query parameters, sends the request through a `Transport`, retries
//! transient failures on a fixed delay, and enforces one deadline over the
//! whole call.
//!
//! # Design
//! - `RequestExecutor` holds only the injected transport, configuration and
//!   retry policy; every call owns its own request and retry state.
//! - Each verb is `build` (pure) followed by `dispatch` (I/O), so request
//!   composition is testable without a network.
//! - `Transport` is the only I/O seam. `ReqwestTransport` is the production
//!   implementation; tests script their own.

pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod reqwest_transport;
pub mod retry;
pub mod transport;
pub mod types;

pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Payload};
pub use reqwest_transport::ReqwestTransport;
pub use retry::{is_retryable, RetryPolicy, RETRY_DELAY};
pub use transport::{Transport, TransportFailure};
pub use types::{Attribute, RequestDescriptor};

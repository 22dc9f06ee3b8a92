//! `Transport` backed by `reqwest`.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Payload};
use crate::transport::{Transport, TransportFailure};

/// Sends requests with a shared `reqwest::Client`.
///
/// Redirects are not followed, so a 3xx comes back as a failure carrying
/// that status. The client has no timeout of its own; the executor's
/// deadline covers the whole call.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client as-is.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        // RequestBuilder::header appends, so repeated names keep every value.
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            Some(Payload::Text(text)) => builder.body(text),
            Some(Payload::Json(value)) => builder.json(&value),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| match e.status() {
            Some(status) => TransportFailure::new(status.as_u16(), e.to_string()),
            None => TransportFailure::unreachable(e.to_string()),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::new(status, e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(TransportFailure::new(status, body));
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

//! The wire exchange behind the dispatcher.
//!
//! # Design
//! `Transport` turns one `HttpRequest` into one `HttpResponse` and nothing
//! more: no retries, no status interpretation. Any status, 4xx and 5xx
//! included, comes back as `Ok`; `Err` is reserved for exchanges that never
//! produced a status. Implementations are shared between callers and must be
//! `Send + Sync`.

use std::sync::Arc;

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport on a shared `ureq` agent.
///
/// The agent is configured with `http_status_as_error(false)` so error
/// statuses reach the interpreter as data.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent (timeouts, proxies, TLS).
    ///
    /// The agent must not treat error statuses as errors, otherwise failing
    /// calls surface as `TransportError` instead of a failed `RestResponse`.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let mut response = match request.method {
            HttpMethod::Get => send_without_body(self.agent.get(url), request),
            HttpMethod::Delete => send_without_body(self.agent.delete(url), request),
            HttpMethod::Post => send_with_body(self.agent.post(url), request),
            HttpMethod::Put => send_with_body(self.agent.put(url), request),
            HttpMethod::Patch => send_with_body(self.agent.patch(url), request),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

type UreqResponse = ureq::http::Response<ureq::Body>;

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> Result<UreqResponse, ureq::Error> {
    match &request.body {
        Some(body) => with_headers(builder.force_send_body(), request).send(body.as_bytes()),
        None => with_headers(builder, request).call(),
    }
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> Result<UreqResponse, ureq::Error> {
    match &request.body {
        Some(body) => with_headers(builder, request).send(body.as_bytes()),
        None => with_headers(builder, request).send_empty(),
    }
}

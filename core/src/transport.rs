//! Executing `HttpRequest` values.
//!
//! # Design
//! `Transport` is the seam between request building and the network. The
//! production implementation is `UreqTransport`; `DebugTransport` decorates
//! any transport with request logging. Non-2xx statuses are returned as data
//! so the caller decides what counts as failure.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one blocking HTTP round-trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as `HttpResponse` values rather than errors.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
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
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (name, value) in &request.query {
            builder = builder.query(name, value);
        }

        let mut response = builder.call().map_err(|e| TransportError::Request {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Body {
                url: request.url.clone(),
                message: e.to_string(),
            })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Number of characters of a credential header kept in debug output.
pub const REDACTED_PREFIX_LEN: usize = 20;

/// Shorten credential-like header values for logging.
///
/// A header is credential-like when its name contains `auth` or `key`
/// (case-insensitive). Such values longer than `REDACTED_PREFIX_LEN`
/// characters are cut to that many characters followed by `...`.
pub fn redact_header_value<'a>(name: &str, value: &'a str) -> Cow<'a, str> {
    let name = name.to_ascii_lowercase();
    if !(name.contains("auth") || name.contains("key")) {
        return Cow::Borrowed(value);
    }
    match value.char_indices().nth(REDACTED_PREFIX_LEN) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &value[..cut])),
        None => Cow::Borrowed(value),
    }
}

/// The lines `DebugTransport` logs for a request: the request line, then one
/// indented line per header.
pub fn describe_request(request: &HttpRequest) -> Vec<String> {
    let mut lines = Vec::with_capacity(request.headers.len() + 1);
    lines.push(format!("{} {}", request.method.as_str(), request.display_url()));
    for (name, value) in &request.headers {
        lines.push(format!("  {name}: {}", redact_header_value(name, value)));
    }
    lines
}

/// Logs outgoing requests, then delegates to the wrapped transport unchanged.
#[derive(Debug, Clone)]
pub struct DebugTransport<T> {
    inner: T,
    enabled: bool,
}

impl<T: Transport> DebugTransport<T> {
    pub fn new(inner: T, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for DebugTransport<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.enabled {
            for line in describe_request(request) {
                tracing::debug!(target: "fathom_core::http", "{line}");
            }
        }
        self.inner.execute(request)
    }
}

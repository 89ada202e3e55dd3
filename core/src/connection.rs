//! The dual-path client.
//!
//! # Design
//! `FathomConnection` can perform each logical request two ways: through a
//! `MeetingsSdk` (typed, vendor defaults applied) or as a raw REST GET
//! (filters passed through, JSON kept as-is). Every primitive converts its
//! failure into a `ResponseEnvelope`; nothing is retried. The composed
//! operations try the preferred path once and fall back to the other once.
//! No state is kept between calls.

use std::sync::Arc;

use serde::Serialize;

use crate::config::ConnectionConfig;
use crate::envelope::{Method, ResponseEnvelope};
use crate::error::{ApiError, ConfigError};
use crate::filters::FilterSet;
use crate::http::HttpRequest;
use crate::rest::RestClient;
use crate::sdk::{FathomSdk, MeetingsSdk};
use crate::transport::{DebugTransport, Transport, UreqTransport};
use crate::types::ApiData;

pub struct FathomConnection {
    config: ConnectionConfig,
    sdk: Option<Box<dyn MeetingsSdk>>,
    rest: RestClient,
    transport: Arc<dyn Transport>,
}

/// Summary of the configured key, safe to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyInfo {
    pub length: usize,
    pub prefix: String,
    pub sdk_client_available: bool,
}

/// One envelope per primitive, from `FathomConnection::test_connection`.
#[derive(Debug, Clone)]
pub struct ConnectionReport {
    pub teams_sdk: ResponseEnvelope,
    pub teams_rest: ResponseEnvelope,
    pub meetings_sdk: ResponseEnvelope,
    pub meetings_rest: ResponseEnvelope,
}

impl ConnectionReport {
    pub fn entries(&self) -> [(&'static str, &ResponseEnvelope); 4] {
        [
            ("teams_sdk", &self.teams_sdk),
            ("teams_rest", &self.teams_rest),
            ("meetings_sdk", &self.meetings_sdk),
            ("meetings_rest", &self.meetings_rest),
        ]
    }
}

impl FathomConnection {
    /// Connect over the network with `ureq`, logging requests when the
    /// config's debug flag is set.
    pub fn new(config: ConnectionConfig) -> Result<Self, ConfigError> {
        let transport = DebugTransport::new(UreqTransport::new(), config.debug());
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build the SDK client over `transport`. An SDK that fails to construct
    /// leaves the connection REST-only.
    pub fn with_transport(
        config: ConnectionConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let sdk = match FathomSdk::new(config.api_key(), config.base_url(), transport.clone()) {
            Ok(sdk) => Some(Box::new(sdk) as Box<dyn MeetingsSdk>),
            Err(e) => {
                tracing::warn!(error = %e, "failed to initialize SDK client");
                None
            }
        };
        Self::with_parts(config, transport, sdk)
    }

    /// Assemble a connection from an explicit SDK handle.
    pub fn with_parts(
        config: ConnectionConfig,
        transport: Arc<dyn Transport>,
        sdk: Option<Box<dyn MeetingsSdk>>,
    ) -> Result<Self, ConfigError> {
        if config.api_key().is_empty() {
            return Err(ConfigError::MissingApiKey { env_file: None });
        }
        let rest = RestClient::new(config.base_url(), config.api_key());
        Ok(Self {
            config,
            sdk,
            rest,
            transport,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn sdk_available(&self) -> bool {
        self.sdk.is_some()
    }

    pub fn rest_headers(&self) -> &[(String, String)] {
        self.rest.headers()
    }

    // SDK path

    pub fn list_teams_sdk(&self) -> ResponseEnvelope {
        let Some(sdk) = &self.sdk else {
            return ResponseEnvelope::sdk_not_initialized();
        };
        match sdk.list_teams() {
            Ok(page) => ResponseEnvelope::success(Method::Sdk, ApiData::Teams(page), None),
            Err(e) => ResponseEnvelope::failure(Method::Sdk, e.to_string(), None),
        }
    }

    pub fn list_meetings_sdk(&self, filters: &FilterSet) -> ResponseEnvelope {
        let Some(sdk) = &self.sdk else {
            return ResponseEnvelope::sdk_not_initialized();
        };
        match sdk.list_meetings(filters) {
            Ok(page) => ResponseEnvelope::success(Method::Sdk, ApiData::Meetings(page), None),
            Err(e) => ResponseEnvelope::failure(Method::Sdk, e.to_string(), None),
        }
    }

    // REST path

    pub fn list_teams_rest(&self) -> ResponseEnvelope {
        self.rest_call(self.rest.build_list_teams())
    }

    pub fn list_meetings_rest(&self, params: &FilterSet) -> ResponseEnvelope {
        self.rest_call(self.rest.build_list_meetings(params))
    }

    fn rest_call(&self, request: HttpRequest) -> ResponseEnvelope {
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => return ResponseEnvelope::failure(Method::Rest, e.to_string(), None),
        };
        let status = response.status;
        match self.rest.parse_payload(response) {
            Ok(payload) => ResponseEnvelope::success(Method::Rest, ApiData::Json(payload), Some(status)),
            Err(ApiError::HttpError { body, .. }) => {
                ResponseEnvelope::failure(Method::Rest, body, Some(status))
            }
            Err(e) => ResponseEnvelope::failure(Method::Rest, e.to_string(), Some(status)),
        }
    }

    // Composed

    /// List teams via the preferred path, falling back to the other once.
    pub fn list_teams(&self, prefer_rest: bool) -> ResponseEnvelope {
        with_fallback(
            prefer_rest,
            || self.list_teams_sdk(),
            || self.list_teams_rest(),
        )
    }

    /// List meetings via the preferred path, falling back to the other once.
    pub fn list_meetings(&self, prefer_rest: bool, filters: &FilterSet) -> ResponseEnvelope {
        with_fallback(
            prefer_rest,
            || self.list_meetings_sdk(filters),
            || self.list_meetings_rest(filters),
        )
    }

    // Utilities

    pub fn api_key_info(&self) -> ApiKeyInfo {
        let key = self.config.api_key();
        ApiKeyInfo {
            length: key.chars().count(),
            prefix: format!("{}...", key.chars().take(10).collect::<String>()),
            sdk_client_available: self.sdk_available(),
        }
    }

    /// Run every primitive once with no filters.
    pub fn test_connection(&self) -> ConnectionReport {
        let none = FilterSet::new();
        ConnectionReport {
            teams_sdk: self.list_teams_sdk(),
            teams_rest: self.list_teams_rest(),
            meetings_sdk: self.list_meetings_sdk(&none),
            meetings_rest: self.list_meetings_rest(&none),
        }
    }
}

/// Try the preferred path; on failure, return whatever the other path
/// returns. The first attempt's error is logged, not returned.
pub fn with_fallback(
    prefer_rest: bool,
    sdk: impl FnOnce() -> ResponseEnvelope,
    rest: impl FnOnce() -> ResponseEnvelope,
) -> ResponseEnvelope {
    if prefer_rest {
        first_success(rest, sdk)
    } else {
        first_success(sdk, rest)
    }
}

fn first_success(
    first: impl FnOnce() -> ResponseEnvelope,
    second: impl FnOnce() -> ResponseEnvelope,
) -> ResponseEnvelope {
    let result = first();
    if result.is_success() {
        tracing::debug!(method = %result.method(), "preferred path succeeded");
        return result;
    }
    tracing::warn!(
        method = %result.method(),
        fallback = %result.method().other(),
        status = ?result.status_code(),
        error = result.error().unwrap_or_default(),
        "preferred path failed, falling back"
    );
    second()
}

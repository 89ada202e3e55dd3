//! The uniform result record returned by every client operation.

use std::fmt;

use serde::Serialize;

use crate::types::ApiData;

/// Which path produced an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Sdk,
    Rest,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Sdk => "sdk",
            Method::Rest => "rest",
        }
    }

    /// The other path, used by the fallback composition.
    pub fn other(self) -> Method {
        match self {
            Method::Sdk => Method::Rest,
            Method::Rest => Method::Sdk,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success with data, or failure with an error message, tagged with the path
/// that produced it and the HTTP status when one was observed.
///
/// The outcome is stored as a `Result`, so a successful envelope never
/// carries an error and a failed one never carries data.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    outcome: Result<ApiData, String>,
    method: Method,
    status_code: Option<u16>,
}

/// Error text of the SDK envelope returned when no SDK client exists.
pub const SDK_NOT_INITIALIZED: &str = "SDK client not initialized";

impl ResponseEnvelope {
    pub fn success(method: Method, data: ApiData, status_code: Option<u16>) -> Self {
        Self {
            outcome: Ok(data),
            method,
            status_code,
        }
    }

    pub fn failure(method: Method, error: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            outcome: Err(error.into()),
            method,
            status_code,
        }
    }

    pub fn sdk_not_initialized() -> Self {
        Self::failure(Method::Sdk, SDK_NOT_INITIALIZED, None)
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn data(&self) -> Option<&ApiData> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn into_outcome(self) -> Result<ApiData, String> {
        self.outcome
    }
}

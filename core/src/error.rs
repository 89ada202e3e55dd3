//! Error types for the Fathom client.
//!
//! # Design
//! Only `ConfigError` ever reaches the caller as an `Err`: it is raised while
//! resolving the API key, before any connection exists. Every other error is
//! rendered with `Display` and folded into a failed `ResponseEnvelope` at the
//! call site, so the variants here exist mainly to produce consistent text.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key was supplied explicitly, via the process environment, or in
    /// the env file.
    #[error("FATHOM_API_KEY not found in {} or provided as parameter", display_env_file(.env_file))]
    MissingApiKey { env_file: Option<PathBuf> },

    /// The env file exists but could not be parsed.
    #[error("failed to read {}: {message}", path.display())]
    EnvFile { path: PathBuf, message: String },
}

fn display_env_file(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "the environment".to_string(),
    }
}

/// The HTTP round-trip itself failed (connection refused, DNS, unreadable body).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Errors produced by the REST path's response parsing.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a non-2xx status. `body` is surfaced verbatim.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not a JSON list or object.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

/// Errors produced by the SDK path.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The key cannot be sent as an HTTP header value.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("invalid base URL {0:?}: expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("API error occurred: status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_env_file() {
        let err = ConfigError::MissingApiKey {
            env_file: Some(PathBuf::from("/home/me/.env")),
        };
        assert_eq!(
            err.to_string(),
            "FATHOM_API_KEY not found in /home/me/.env or provided as parameter"
        );
    }

    #[test]
    fn missing_api_key_without_env_file() {
        let err = ConfigError::MissingApiKey { env_file: None };
        assert!(err.to_string().contains("the environment"));
    }

    #[test]
    fn sdk_transport_error_is_transparent() {
        let err = SdkError::from(TransportError::Request {
            url: "http://localhost/teams".to_string(),
            message: "connection refused".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "request to http://localhost/teams failed: connection refused"
        );
    }
}

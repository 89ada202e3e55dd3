//! Request builder and response parser for the raw REST path.
//!
//! # Design
//! `RestClient` holds the base URL and the fixed header list and carries no
//! mutable state between calls. Each endpoint is split into a `build_*`
//! method producing an `HttpRequest` and a shared `parse_payload` consuming
//! the `HttpResponse`; the connection runs the round-trip in between.
//! Filters are passed through verbatim as query parameters.

use crate::error::ApiError;
use crate::filters::FilterSet;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Payload;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: vec![
                (API_KEY_HEADER.to_string(), api_key.to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn build_list_teams(&self) -> HttpRequest {
        self.build_get("teams", &FilterSet::new())
    }

    pub fn build_list_meetings(&self, params: &FilterSet) -> HttpRequest {
        self.build_get("meetings", params)
    }

    fn build_get(&self, resource: &str, params: &FilterSet) -> HttpRequest {
        HttpRequest {
            headers: self.headers.clone(),
            query: params.to_query(),
            ..HttpRequest::get(format!("{}/{resource}", self.base_url))
        }
    }

    /// Decode a response body into a `Payload`.
    ///
    /// Any non-2xx status is an `HttpError` carrying the raw body.
    pub fn parse_payload(&self, response: HttpResponse) -> Result<Payload, ApiError> {
        check_status(&response)?;
        let value: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Payload::from_value(value).map_err(|other| {
            ApiError::DeserializationError(format!("expected a JSON list or object, got {other}"))
        })
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

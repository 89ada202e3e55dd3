//! The vendor-SDK path.
//!
//! # Design
//! `MeetingsSdk` is the capability the connection depends on; it hides how
//! the SDK talks to the API. `FathomSdk` is the in-tree implementation. It
//! validates its credentials when constructed, layers the vendor's default
//! filters under the caller's, and deserializes typed pages, so it fails in
//! different places than the raw REST path does.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::SdkError;
use crate::filters::{self, FilterSet};
use crate::http::HttpRequest;
use crate::rest::API_KEY_HEADER;
use crate::transport::Transport;
use crate::types::{Meeting, Page, Team};

pub const SDK_USER_AGENT: &str = concat!("fathom-core/", env!("CARGO_PKG_VERSION"));

/// Operations a vendor SDK client exposes.
pub trait MeetingsSdk: Send + Sync {
    fn list_teams(&self) -> Result<Page<Team>, SdkError>;

    fn list_meetings(&self, filters: &FilterSet) -> Result<Page<Meeting>, SdkError>;
}

/// Filters the SDK applies to every meetings listing unless the caller
/// overrides or unsets them.
pub fn default_meeting_filters() -> FilterSet {
    FilterSet::new()
        .with(
            filters::CALENDAR_INVITEES_DOMAINS_TYPE,
            filters::CalendarInviteesDomainsType::All,
        )
        .with(filters::INCLUDE_ACTION_ITEMS, false)
        .with(filters::INCLUDE_CRM_MATCHES, false)
        .with(filters::INCLUDE_SUMMARY, false)
        .with(filters::INCLUDE_TRANSCRIPT, false)
}

/// Typed SDK client over a shared `Transport`.
pub struct FathomSdk {
    base_url: String,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl FathomSdk {
    pub fn new(
        api_key: &str,
        base_url: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SdkError> {
        validate_api_key(api_key)?;
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(SdkError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            transport,
        })
    }

    /// The request `list_meetings` sends for `filters`.
    pub fn build_list_meetings(&self, filters: &FilterSet) -> HttpRequest {
        let params = default_meeting_filters().merge(filters.clone());
        self.request("meetings", &params)
    }

    pub fn build_list_teams(&self) -> HttpRequest {
        self.request("teams", &FilterSet::new())
    }

    fn request(&self, resource: &str, params: &FilterSet) -> HttpRequest {
        HttpRequest {
            headers: vec![
                (API_KEY_HEADER.to_string(), self.api_key.clone()),
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), SDK_USER_AGENT.to_string()),
            ],
            query: params.to_query(),
            ..HttpRequest::get(format!("{}/{resource}", self.base_url))
        }
    }

    fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, SdkError> {
        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            return Err(SdkError::Status {
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| SdkError::Deserialization(e.to_string()))
    }
}

impl MeetingsSdk for FathomSdk {
    fn list_teams(&self) -> Result<Page<Team>, SdkError> {
        self.fetch(self.build_list_teams())
    }

    fn list_meetings(&self, filters: &FilterSet) -> Result<Page<Meeting>, SdkError> {
        self.fetch(self.build_list_meetings(filters))
    }
}

/// An API key must be usable as a header value: non-empty visible ASCII,
/// no surrounding whitespace.
fn validate_api_key(api_key: &str) -> Result<(), SdkError> {
    if api_key.is_empty() {
        return Err(SdkError::InvalidApiKey("key is empty".to_string()));
    }
    if api_key.trim() != api_key {
        return Err(SdkError::InvalidApiKey(
            "key has leading or trailing whitespace".to_string(),
        ));
    }
    if let Some(c) = api_key.chars().find(|c| !(c.is_ascii_graphic() || *c == ' ')) {
        return Err(SdkError::InvalidApiKey(format!(
            "key contains invalid character {c:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;
    use std::sync::Mutex;

    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.to_string(),
            })
        }
    }

    fn sdk(transport: Arc<Canned>) -> FathomSdk {
        FathomSdk::new("secret-key", "https://api.fathom.ai/external/v1", transport).unwrap()
    }

    #[test]
    fn defaults_are_sent_when_caller_passes_nothing() {
        let transport = Canned::new(200, r#"{"items":[]}"#);
        let req = sdk(transport).build_list_meetings(&FilterSet::new());
        assert_eq!(req.url, "https://api.fathom.ai/external/v1/meetings");
        assert_eq!(req.query_value("calendar_invitees_domains_type"), Some("all"));
        assert_eq!(req.query_value("include_action_items"), Some("false"));
        assert_eq!(req.query_value("include_crm_matches"), Some("false"));
        assert_eq!(req.query_value("include_summary"), Some("false"));
        assert_eq!(req.query_value("include_transcript"), Some("false"));
        assert_eq!(req.header("x-api-key"), Some("secret-key"));
    }

    #[test]
    fn caller_filters_override_defaults() {
        let transport = Canned::new(200, r#"{"items":[]}"#);
        let params = filters::external_meetings().merge(filters::with_details());
        let req = sdk(transport).build_list_meetings(&params);
        assert_eq!(
            req.query_value("calendar_invitees_domains_type"),
            Some("one_or_more_external")
        );
        assert_eq!(req.query_value("include_transcript"), Some("true"));
    }

    #[test]
    fn unset_filters_suppress_defaults() {
        let transport = Canned::new(200, r#"{"items":[]}"#);
        let params = filters::without_defaults();
        assert!(params.is_unset("include_summary"));
        let req = sdk(transport).build_list_meetings(&params);
        assert!(req.query.is_empty());
    }

    #[test]
    fn meeting_type_drops_domains_type() {
        let transport = Canned::new(200, r#"{"items":[]}"#);
        let params = filters::meeting_type(filters::MeetingType::Internal);
        let req = sdk(transport).build_list_meetings(&params);
        assert_eq!(req.query_value("meeting_type"), Some("internal"));
        assert_eq!(req.query_value("calendar_invitees_domains_type"), None);
    }

    #[test]
    fn list_meetings_deserializes_typed_page() {
        let transport = Canned::new(
            200,
            r#"{"items":[{"title":"Sync","recording_id":7}],"next_cursor":null,"limit":10}"#,
        );
        let page = sdk(transport.clone()).list_meetings(&FilterSet::new()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].recording_id, Some(7));
        assert_eq!(page.limit, Some(10));
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn error_status_becomes_sdk_error() {
        let transport = Canned::new(403, "forbidden");
        let err = sdk(transport).list_teams().unwrap_err();
        assert!(matches!(err, SdkError::Status { status: 403, .. }));
        assert!(err.to_string().contains("forbidden"));
    }

    #[test]
    fn unexpected_shape_becomes_deserialization_error() {
        let transport = Canned::new(200, r#"{"items":[{"created_at":"2024-01-01T00:00:00Z"}]}"#);
        let err = sdk(transport).list_teams().unwrap_err();
        assert!(matches!(err, SdkError::Deserialization(_)));
    }

    #[test]
    fn construction_rejects_bad_keys_and_urls() {
        let transport: Arc<dyn Transport> = Canned::new(200, "{}");
        assert!(matches!(
            FathomSdk::new("", "https://x", transport.clone()),
            Err(SdkError::InvalidApiKey(_))
        ));
        assert!(matches!(
            FathomSdk::new("key\nwith-newline", "https://x", transport.clone()),
            Err(SdkError::InvalidApiKey(_))
        ));
        assert!(matches!(
            FathomSdk::new(" padded", "https://x", transport.clone()),
            Err(SdkError::InvalidApiKey(_))
        ));
        assert!(matches!(
            FathomSdk::new("good-key", "ftp://x", transport),
            Err(SdkError::InvalidBaseUrl(_))
        ));
    }
}

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub recording_id: u64,
    /// `only_internal` or `one_or_more_external`.
    pub calendar_invitees_domains_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug)]
pub struct MockState {
    pub api_key: String,
    pub teams: Vec<Team>,
    pub meetings: Vec<Meeting>,
}

pub type Db = Arc<MockState>;

type ApiResult = Result<Json<Value>, (StatusCode, String)>;

impl MockState {
    pub fn empty(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            teams: Vec::new(),
            meetings: Vec::new(),
        }
    }

    /// Two teams and three meetings, one internal and two external.
    pub fn sample(api_key: &str) -> Self {
        let at = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default()
        };
        Self {
            api_key: api_key.to_string(),
            teams: vec![
                Team {
                    name: "Engineering".to_string(),
                    created_at: at("2023-01-15T09:00:00Z"),
                },
                Team {
                    name: "Sales".to_string(),
                    created_at: at("2023-02-01T09:00:00Z"),
                },
            ],
            meetings: vec![
                Meeting {
                    title: "Engineering standup".to_string(),
                    url: "https://fathom.video/calls/1001".to_string(),
                    created_at: at("2024-03-01T10:00:00Z"),
                    recording_id: 1001,
                    calendar_invitees_domains_type: "only_internal".to_string(),
                },
                Meeting {
                    title: "Customer onboarding".to_string(),
                    url: "https://fathom.video/calls/1002".to_string(),
                    created_at: at("2024-03-05T15:30:00Z"),
                    recording_id: 1002,
                    calendar_invitees_domains_type: "one_or_more_external".to_string(),
                },
                Meeting {
                    title: "Partner sync".to_string(),
                    url: "https://fathom.video/calls/1003".to_string(),
                    created_at: at("2024-03-10T13:00:00Z"),
                    recording_id: 1003,
                    calendar_invitees_domains_type: "one_or_more_external".to_string(),
                },
            ],
        }
    }
}

pub fn app(state: MockState) -> Router {
    let db: Db = Arc::new(state);
    Router::new()
        .route("/teams", get(list_teams))
        .route("/meetings", get(list_meetings))
        .with_state(db)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

fn authorize(db: &MockState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if presented == Some(db.api_key.as_str()) {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "Unauthorized: invalid API key".to_string()))
    }
}

fn bad_request(message: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, message.into())
}

async fn list_teams(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    authorize(&db, &headers)?;
    let page = Page {
        items: db.teams.clone(),
        next_cursor: None,
        limit: None,
    };
    Ok(Json(json!(page)))
}

async fn list_meetings(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    authorize(&db, &headers)?;

    let domains = params.get("calendar_invitees_domains_type").map(String::as_str);
    let meeting_type = params.get("meeting_type").map(String::as_str);
    let wanted_domains = match (domains, meeting_type) {
        (Some(_), Some(_)) => {
            return Err(bad_request(
                "Cannot specify both meeting_type and calendar_invitees_domains_type",
            ))
        }
        (Some("all"), None) | (None, Some("all")) | (None, None) => None,
        (Some(d @ ("only_internal" | "one_or_more_external")), None) => Some(d),
        (None, Some("internal")) => Some("only_internal"),
        (None, Some("external")) => Some("one_or_more_external"),
        (Some(other), None) | (None, Some(other)) => {
            return Err(bad_request(format!("invalid meeting filter: {other}")))
        }
    };

    let created_after = match params.get("created_after") {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|e| bad_request(format!("invalid created_after: {e}")))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    let limit = match params.get("limit") {
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| bad_request(format!("invalid limit: {raw}")))?,
        ),
        None => None,
    };

    let mut matching: Vec<&Meeting> = db
        .meetings
        .iter()
        .filter(|m| wanted_domains.map_or(true, |d| m.calendar_invitees_domains_type == d))
        .filter(|m| created_after.map_or(true, |after| m.created_at > after))
        .collect();

    let mut next_cursor = None;
    if let Some(limit) = limit {
        if matching.len() > limit as usize {
            matching.truncate(limit as usize);
            next_cursor = Some(format!("cursor-{limit}"));
        }
    }

    let include = |flag: &str| params.get(flag).map(String::as_str) == Some("true");
    let items: Vec<Value> = matching
        .into_iter()
        .map(|m| {
            let mut item = json!(m);
            if include("include_summary") {
                item["default_summary"] = json!({"markdown_formatted": format!("Summary of {}", m.title)});
            }
            if include("include_action_items") {
                item["action_items"] = json!([]);
            }
            if include("include_transcript") {
                item["transcript"] = json!([]);
            }
            if include("include_crm_matches") {
                item["crm_matches"] = json!(null);
            }
            item
        })
        .collect();

    Ok(Json(json!({
        "items": items,
        "next_cursor": next_cursor,
        "limit": limit,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_serializes_to_json() {
        let state = MockState::sample("k");
        let json = serde_json::to_value(&state.meetings[0]).unwrap();
        assert_eq!(json["title"], "Engineering standup");
        assert_eq!(json["created_at"], "2024-03-01T10:00:00Z");
        assert_eq!(json["calendar_invitees_domains_type"], "only_internal");
        assert_eq!(json["recording_id"], 1001);
    }

    #[test]
    fn page_serializes_null_cursor() {
        let page: Page<Team> = Page {
            items: Vec::new(),
            next_cursor: None,
            limit: None,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json, json!({"items": [], "next_cursor": null, "limit": null}));
    }

    #[test]
    fn sample_has_internal_and_external_meetings() {
        let state = MockState::sample("k");
        let internal = state
            .meetings
            .iter()
            .filter(|m| m.calendar_invitees_domains_type == "only_internal")
            .count();
        assert_eq!(internal, 1);
        assert_eq!(state.meetings.len(), 3);
        assert_eq!(state.teams.len(), 2);
    }

    #[test]
    fn authorize_requires_exact_key() {
        let state = MockState::empty("secret");
        let mut headers = HeaderMap::new();
        assert!(authorize(&state, &headers).is_err());
        headers.insert(API_KEY_HEADER, "wrong".parse().unwrap());
        assert!(authorize(&state, &headers).is_err());
        headers.insert(API_KEY_HEADER, "secret".parse().unwrap());
        assert!(authorize(&state, &headers).is_ok());
    }
}

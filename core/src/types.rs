//! Response shapes for the Fathom API.
//!
//! # Design
//! The SDK path deserializes into the typed `Page<Team>` / `Page<Meeting>`
//! records. The REST path keeps the body as raw JSON but normalizes it once,
//! at decode time, into a `Payload` that is either list-shaped or
//! mapping-shaped. Typed records carry an `extra` map so fields this crate
//! does not model survive the round-trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recorder {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub meeting_title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub share_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recording_id: Option<u64>,
    #[serde(default)]
    pub transcript_language: Option<String>,
    #[serde(default)]
    pub calendar_invitees_domains_type: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<Recorder>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meeting {
    /// Named fields that are present, in declaration order, followed by the
    /// unmodelled `extra` fields. Values are rendered as display strings.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                out.push((name.to_string(), value));
            }
        };
        push("title", self.title.clone());
        push("meeting_title", self.meeting_title.clone());
        push("url", self.url.clone());
        push("share_url", self.share_url.clone());
        push("created_at", self.created_at.map(|t| t.to_rfc3339()));
        push("scheduled_start_time", self.scheduled_start_time.map(|t| t.to_rfc3339()));
        push("scheduled_end_time", self.scheduled_end_time.map(|t| t.to_rfc3339()));
        push("recording_id", self.recording_id.map(|id| id.to_string()));
        push("transcript_language", self.transcript_language.clone());
        push(
            "calendar_invitees_domains_type",
            self.calendar_invitees_domains_type.clone(),
        );
        push(
            "recorded_by",
            self.recorded_by
                .as_ref()
                .map(|r| match (&r.name, &r.email) {
                    (Some(name), Some(email)) => format!("{name} <{email}>"),
                    (Some(name), None) => name.clone(),
                    (None, Some(email)) => email.clone(),
                    (None, None) => "unknown".to_string(),
                }),
        );
        for (key, value) in &self.extra {
            if !value.is_null() {
                push(key.as_str(), Some(json_display(value)));
            }
        }
        out
    }
}

/// Render a JSON value the way a person would read it: strings unquoted,
/// everything else as compact JSON.
pub fn json_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A REST response body, resolved once into one of the two shapes the API
/// returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    List(Vec<Value>),
    Mapping(Map<String, Value>),
}

impl Payload {
    /// Classify a decoded body. Scalars and `null` are not valid payloads.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Array(items) => Ok(Payload::List(items)),
            Value::Object(map) => Ok(Payload::Mapping(map)),
            other => Err(other),
        }
    }

    /// The listed records: the list itself, or a mapping's `items` array.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Payload::List(items) => Some(items),
            Payload::Mapping(map) => map.get("items").and_then(Value::as_array).map(Vec::as_slice),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Payload::List(_) => None,
            Payload::Mapping(map) => map.get(key),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Payload::List(items) => Value::Array(items.clone()),
            Payload::Mapping(map) => Value::Object(map.clone()),
        }
    }
}

/// Successful data carried by a `ResponseEnvelope`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiData {
    Teams(Page<Team>),
    Meetings(Page<Meeting>),
    Json(Payload),
}

impl ApiData {
    /// Number of listed records, whichever path produced them.
    pub fn item_count(&self) -> Option<usize> {
        match self {
            ApiData::Teams(page) => Some(page.items.len()),
            ApiData::Meetings(page) => Some(page.items.len()),
            ApiData::Json(payload) => payload.items().map(<[Value]>::len),
        }
    }

    pub fn as_meetings(&self) -> Option<&Page<Meeting>> {
        match self {
            ApiData::Meetings(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_teams(&self) -> Option<&Page<Team>> {
        match self {
            ApiData::Teams(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_payload(&self) -> Option<&Payload> {
        match self {
            ApiData::Json(payload) => Some(payload),
            _ => None,
        }
    }
}

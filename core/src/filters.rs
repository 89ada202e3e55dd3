//! Query parameters for the meetings endpoint and builders for common
//! patterns.
//!
//! # Design
//! A `FilterSet` is an ordered map from parameter name to `FilterValue`.
//! Builders are pure functions returning small sets that the caller merges;
//! on a key collision the later operand wins. `FilterValue::Unset` marks a
//! parameter as explicitly absent: it is never sent, and on the SDK path it
//! suppresses that parameter's default.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

pub const CREATED_AFTER: &str = "created_after";
pub const CALENDAR_INVITEES_DOMAINS_TYPE: &str = "calendar_invitees_domains_type";
pub const MEETING_TYPE: &str = "meeting_type";
pub const INCLUDE_ACTION_ITEMS: &str = "include_action_items";
pub const INCLUDE_CRM_MATCHES: &str = "include_crm_matches";
pub const INCLUDE_SUMMARY: &str = "include_summary";
pub const INCLUDE_TRANSCRIPT: &str = "include_transcript";

/// Which invitee domains a meeting must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarInviteesDomainsType {
    All,
    OnlyInternal,
    OneOrMoreExternal,
}

impl CalendarInviteesDomainsType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::OnlyInternal => "only_internal",
            Self::OneOrMoreExternal => "one_or_more_external",
        }
    }
}

/// Deprecated predecessor of `CalendarInviteesDomainsType`. The API rejects
/// requests that set both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    All,
    Internal,
    External,
}

impl MeetingType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Internal => "internal",
            Self::External => "external",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    DomainsType(CalendarInviteesDomainsType),
    MeetingType(MeetingType),
    Bool(bool),
    Unset,
}

impl FilterValue {
    /// Wire form of the value, or `None` for `Unset`.
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            FilterValue::Text(s) => Some(s.clone()),
            FilterValue::DomainsType(d) => Some(d.as_str().to_string()),
            FilterValue::MeetingType(m) => Some(m.as_str().to_string()),
            FilterValue::Bool(b) => Some(b.to_string()),
            FilterValue::Unset => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_query_value() {
            Some(v) => f.write_str(&v),
            None => f.write_str("<unset>"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Text(n.to_string())
    }
}

impl From<CalendarInviteesDomainsType> for FilterValue {
    fn from(d: CalendarInviteesDomainsType) -> Self {
        FilterValue::DomainsType(d)
    }
}

impl From<MeetingType> for FilterValue {
    fn from(m: MeetingType) -> Self {
        FilterValue::MeetingType(m)
    }
}

/// Named query parameters. Iteration is in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    params: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces any existing value for `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.params.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// True when `name` is explicitly unset and will be omitted from the wire.
    pub fn is_unset(&self, name: &str) -> bool {
        matches!(self.get(name), Some(FilterValue::Unset))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Union of `self` and `other`; `other` wins on key collision.
    pub fn merge(mut self, other: FilterSet) -> Self {
        self.params.extend(other.params);
        self
    }

    /// Query pairs for the wire, skipping `Unset` values.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter_map(|(k, v)| v.to_query_value().map(|v| (k.clone(), v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Meetings created in the last `days` days, measured from now.
pub fn last_n_days(days: i64) -> FilterSet {
    last_n_days_from(Utc::now(), days)
}

/// Meetings created after `now - days`. Zero and negative `days` are passed
/// through; a result outside chrono's range saturates to its bound.
pub fn last_n_days_from(now: DateTime<Utc>, days: i64) -> FilterSet {
    let since = TimeDelta::try_days(days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(if days >= 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
    FilterSet::new().with(
        CREATED_AFTER,
        since.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Meetings with at least one invitee outside the recorder's domain.
pub fn external_meetings() -> FilterSet {
    FilterSet::new().with(
        CALENDAR_INVITEES_DOMAINS_TYPE,
        CalendarInviteesDomainsType::OneOrMoreExternal,
    )
}

/// Meetings whose invitees all share the recorder's domain.
pub fn internal_meetings() -> FilterSet {
    FilterSet::new().with(
        CALENDAR_INVITEES_DOMAINS_TYPE,
        CalendarInviteesDomainsType::OnlyInternal,
    )
}

/// Ask for every optional detail field.
pub fn with_details() -> FilterSet {
    FilterSet::new()
        .with(INCLUDE_ACTION_ITEMS, true)
        .with(INCLUDE_CRM_MATCHES, true)
        .with(INCLUDE_SUMMARY, true)
        .with(INCLUDE_TRANSCRIPT, true)
}

/// Filter by the deprecated `meeting_type`. Clears the domains-type filter,
/// which the API refuses to combine with it.
pub fn meeting_type(kind: MeetingType) -> FilterSet {
    FilterSet::new()
        .with(MEETING_TYPE, kind)
        .with(CALENDAR_INVITEES_DOMAINS_TYPE, FilterValue::Unset)
}

/// Unset every parameter the SDK would otherwise default.
pub fn without_defaults() -> FilterSet {
    FilterSet::new()
        .with(CALENDAR_INVITEES_DOMAINS_TYPE, FilterValue::Unset)
        .with(INCLUDE_ACTION_ITEMS, FilterValue::Unset)
        .with(INCLUDE_CRM_MATCHES, FilterValue::Unset)
        .with(INCLUDE_SUMMARY, FilterValue::Unset)
        .with(INCLUDE_TRANSCRIPT, FilterValue::Unset)
}

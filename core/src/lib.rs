//! Synchronous dual-path client for the Fathom meeting-intelligence API.
//!
//! # Overview
//! Every listing can be fetched two ways: through a typed SDK client
//! (`MeetingsSdk`) or as a raw REST GET. `FathomConnection` exposes each path
//! on its own and a composition that tries the preferred path and falls back
//! to the other once. All operations return a `ResponseEnvelope` rather than
//! an error; only configuration problems surface as `Err`.
//!
//! # Design
//! - Requests and responses are plain data (`http`), executed by a
//!   `Transport`. `DebugTransport` logs each request with credentials
//!   truncated.
//! - `RestClient` and `FathomSdk` build and parse; the connection owns the
//!   round-trip and turns failures into envelopes.
//! - Filter builders (`filters`) are pure functions returning mergeable
//!   `FilterSet`s.
//! - `config` resolves the API key before a connection exists.

pub mod config;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod filters;
pub mod http;
pub mod rest;
pub mod sdk;
pub mod transport;
pub mod types;

pub use config::ConnectionConfig;
pub use connection::{ApiKeyInfo, ConnectionReport, FathomConnection};
pub use envelope::{Method, ResponseEnvelope};
pub use error::{ApiError, ConfigError, SdkError, TransportError};
pub use filters::{CalendarInviteesDomainsType, FilterSet, FilterValue, MeetingType};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use rest::RestClient;
pub use sdk::{FathomSdk, MeetingsSdk};
pub use transport::{DebugTransport, Transport, UreqTransport};
pub use types::{ApiData, Meeting, Page, Payload, Recorder, Team};

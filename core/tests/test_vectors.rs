//! Verify REST request building and response parsing against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector file describes filters, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use fathom_core::{ApiError, FilterSet, FilterValue, HttpMethod, HttpResponse, RestClient};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";
const API_KEY: &str = "test-key";

fn client() -> RestClient {
    RestClient::new(BASE_URL, API_KEY)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

/// JSON strings become text, booleans flags, and `null` an unset parameter.
fn filters(value: &Value) -> FilterSet {
    value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => FilterValue::Text(s.clone()),
                Value::Bool(b) => FilterValue::Bool(*b),
                Value::Null => FilterValue::Unset,
                other => panic!("unsupported filter value: {other}"),
            };
            (k.clone(), v)
        })
        .collect()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_parse(c: &RestClient, name: &str, case: &Value) {
    let result = c.parse_payload(simulated(case));

    match case.get("expected_error") {
        Some(Value::String(kind)) => match (kind.as_str(), result) {
            ("DeserializationError", Err(ApiError::DeserializationError(_))) => {}
            (kind, other) => panic!("{name}: expected {kind}, got {other:?}"),
        },
        Some(expected) => match result {
            Err(ApiError::HttpError { status, body }) => {
                assert_eq!(u64::from(status), expected["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(body, expected["body"].as_str().unwrap(), "{name}: body");
            }
            other => panic!("{name}: expected HttpError, got {other:?}"),
        },
        None => {
            let payload = result.unwrap();
            assert_eq!(payload.to_value(), case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[test]
fn list_teams_test_vectors() {
    let raw = include_str!("../../test-vectors/list_teams.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_teams();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, pairs(&expected_req["headers"]), "{name}: headers");
        assert_eq!(req.query, pairs(&expected_req["query"]), "{name}: query");

        // Verify parse
        check_parse(&c, name, case);
    }
}

// ---------------------------------------------------------------------------
// Meetings
// ---------------------------------------------------------------------------

#[test]
fn list_meetings_test_vectors() {
    let raw = include_str!("../../test-vectors/list_meetings.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_meetings(&filters(&case["filters"]));
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, pairs(&expected_req["headers"]), "{name}: headers");
        assert_eq!(req.query, pairs(&expected_req["query"]), "{name}: query");

        // Verify parse
        check_parse(&c, name, case);
    }
}

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Meeting, MockState, Page, Team};
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", KEY)
        .header("accept", "application/json")
        .body(String::new())
        .unwrap()
}

async fn meetings(uri: &str) -> Page<Meeting> {
    let resp = app(MockState::sample(KEY)).oneshot(get(uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_key_returns_401() {
    let resp = app(MockState::sample(KEY))
        .oneshot(Request::builder().uri("/teams").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"Unauthorized: invalid API key");
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app(MockState::sample("other-key"))
        .oneshot(get("/meetings"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- teams ---

#[tokio::test]
async fn list_teams_empty() {
    let resp = app(MockState::empty(KEY)).oneshot(get("/teams")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<Team> = body_json(resp).await;
    assert!(page.items.is_empty());
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn list_teams_sample() {
    let resp = app(MockState::sample(KEY)).oneshot(get("/teams")).await.unwrap();

    let page: Page<Team> = body_json(resp).await;
    let names: Vec<_> = page.items.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Engineering", "Sales"]);
}

// --- meetings ---

#[tokio::test]
async fn list_meetings_unfiltered() {
    let page = meetings("/meetings").await;
    assert_eq!(page.items.len(), 3);
    assert!(page.limit.is_none());
}

#[tokio::test]
async fn domain_filters() {
    let page = meetings("/meetings?calendar_invitees_domains_type=only_internal").await;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Engineering standup");

    let page = meetings("/meetings?calendar_invitees_domains_type=one_or_more_external").await;
    assert_eq!(page.items.len(), 2);

    let page = meetings("/meetings?calendar_invitees_domains_type=all").await;
    assert_eq!(page.items.len(), 3);
}

#[tokio::test]
async fn deprecated_meeting_type_filter() {
    let page = meetings("/meetings?meeting_type=external").await;
    assert_eq!(page.items.len(), 2);
    let page = meetings("/meetings?meeting_type=internal").await;
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn meeting_type_with_domains_type_returns_400() {
    let resp = app(MockState::sample(KEY))
        .oneshot(get(
            "/meetings?meeting_type=all&calendar_invitees_domains_type=all",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn created_after_filter() {
    let page = meetings("/meetings?created_after=2024-03-04T00:00:00Z").await;
    let ids: Vec<_> = page.items.iter().map(|m| m.recording_id).collect();
    assert_eq!(ids, vec![1002, 1003]);
}

#[tokio::test]
async fn bad_created_after_returns_400() {
    let resp = app(MockState::sample(KEY))
        .oneshot(get("/meetings?created_after=yesterday"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn limit_truncates_and_sets_cursor() {
    let page = meetings("/meetings?limit=2").await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.limit, Some(2));
    assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));

    let page = meetings("/meetings?limit=10").await;
    assert_eq!(page.items.len(), 3);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn detail_flags_add_fields() {
    let resp = app(MockState::sample(KEY))
        .oneshot(get(
            "/meetings?include_summary=true&include_transcript=false&calendar_invitees_domains_type=only_internal",
        ))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    let item = &body["items"][0];
    assert_eq!(
        item["default_summary"]["markdown_formatted"],
        "Summary of Engineering standup"
    );
    assert!(item.get("transcript").is_none());
}

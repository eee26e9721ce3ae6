use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use yt_data_client::{Privacy, YouTubeClient, YouTubeError, fetch_all};

const TOKEN: &str = "test-access-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn playlist(id: &str, title: &str, privacy: &str, count: u64) -> Value {
    json!({
        "kind": "youtube#playlist",
        "id": id,
        "snippet": {"title": title},
        "status": {"privacyStatus": privacy},
        "contentDetails": {"itemCount": count}
    })
}

fn item(video_id: &str, title: &str) -> Value {
    json!({
        "snippet": {
            "title": title,
            "description": "",
            "publishedAt": "2024-01-01T00:00:00Z",
            "videoOwnerChannelTitle": "Someone"
        },
        "contentDetails": {"videoId": video_id}
    })
}

async fn channels(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"code": 401}})));
    }
    (
        StatusCode::OK,
        Json(json!({"items": [{"id": "UC1", "snippet": {"title": "My Channel"}}]})),
    )
}

async fn playlists(
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) || q.get("mine").map(String::as_str) != Some("true") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"code": 401}})));
    }
    let body = match q.get("pageToken").map(String::as_str) {
        None => json!({
            "items": [playlist("P1", "First", "public", 2)],
            "nextPageToken": "page2"
        }),
        // an empty page in the middle of the listing
        Some("page2") => json!({"items": [], "nextPageToken": "page3"}),
        Some("page3") => json!({
            "items": [
                playlist("P2", "Second", "unlisted", 0),
                playlist("P3", "Third", "private", 1)
            ]
        }),
        Some(_) => return (StatusCode::BAD_REQUEST, Json(json!({"error": {"code": 400}}))),
    };
    (StatusCode::OK, Json(body))
}

async fn playlist_items(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    let playlist_id = q.get("playlistId").cloned().unwrap_or_default();
    let page = q.get("pageToken").cloned();
    match (playlist_id.as_str(), page.as_deref()) {
        ("P1", None) => (
            StatusCode::OK,
            Json(json!({"items": [item("v1", "One")], "nextPageToken": "more"})),
        ),
        ("P1", Some("more")) => (StatusCode::OK, Json(json!({"items": [item("v2", "Two")]}))),
        ("BROKEN", None) => (
            StatusCode::OK,
            Json(json!({"items": [item("v9", "Kept")], "nextPageToken": "next"})),
        ),
        _ => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "playlistItemsNotAccessible"}})),
        ),
    }
}

async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/youtube/v3/channels", get(channels))
        .route("/youtube/v3/playlists", get(playlists))
        .route("/youtube/v3/playlistItems", get(playlist_items));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn identifies_channel() {
    let client = YouTubeClient::new(spawn_mock().await, TOKEN).unwrap();
    let channel = client.my_channel().await.unwrap().unwrap();
    assert_eq!(channel.id, "UC1");
    assert_eq!(channel.title, "My Channel");
}

#[tokio::test]
async fn lists_every_playlist_across_pages() {
    let client = YouTubeClient::new(spawn_mock().await, TOKEN).unwrap();

    let playlists = fetch_all(&mut client.my_playlists()).await.unwrap();

    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2", "P3"]);
    assert_eq!(playlists[1].privacy, Privacy::Unlisted);
    assert_eq!(playlists[0].video_count, 2);
}

#[tokio::test]
async fn lists_playlist_items_across_pages() {
    let client = YouTubeClient::new(spawn_mock().await, TOKEN).unwrap();

    let videos = fetch_all(&mut client.playlist_items("P1")).await.unwrap();

    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v2"]);
    assert_eq!(videos[0].channel_title, "Someone");
}

#[tokio::test]
async fn failing_page_reports_status_and_keeps_earlier_items() {
    let client = YouTubeClient::new(spawn_mock().await, TOKEN).unwrap();

    let partial = fetch_all(&mut client.playlist_items("BROKEN"))
        .await
        .unwrap_err();

    assert_eq!(partial.items.len(), 1);
    assert_eq!(partial.items[0].title, "Kept");
    match partial.error {
        YouTubeError::Status { status, body, .. } => {
            assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
            assert!(body.contains("playlistItemsNotAccessible"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rejected_token_is_a_status_error() {
    let client = YouTubeClient::new(spawn_mock().await, "wrong").unwrap();
    let err = client.my_channel().await.unwrap_err();
    assert!(matches!(err, YouTubeError::Status { .. }));
    assert!(err.to_string().contains("401"));
}

/// In-process fixtures standing in for the YouTube endpoints.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A fake channel: videos in listing order, plus per-video caption XML.
/// Videos without captions get a watch page with no caption tracks.
#[derive(Default)]
pub struct FakeChannel {
    pub videos: Vec<(String, String)>,
    pub captions: HashMap<String, String>,
    pub page_size: usize,
    /// Extra non-video items (playlists) mixed into the first page.
    pub playlists: usize,
    /// Fail the listing with this status from the given 1-based page on.
    pub fail_from_page: Option<(usize, StatusCode)>,
    pub search_requests: AtomicUsize,
}

impl FakeChannel {
    pub fn with_videos(count: usize) -> Self {
        Self {
            videos: (0..count)
                .map(|i| (format!("vid{:08}", i), format!("Video number {}", i)))
                .collect(),
            page_size: 50,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> usize {
        self.search_requests.load(Ordering::SeqCst)
    }
}

/// Build a router serving `/v3/search`, `/watch`, and `/timedtext`.
pub fn router(channel: Arc<FakeChannel>) -> Router {
    Router::new()
        .route("/v3/search", get(search))
        .route("/watch", get(watch))
        .route("/timedtext", get(timedtext))
        .with_state(channel)
}

async fn search(
    State(channel): State<Arc<FakeChannel>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let request_no = channel.search_requests.fetch_add(1, Ordering::SeqCst) + 1;

    if let Some((from, status)) = channel.fail_from_page {
        if request_no >= from {
            let body = json!({ "error": { "code": status.as_u16(), "message": "quota exceeded" } });
            return (status, axum::Json(body)).into_response();
        }
    }

    if params.get("key").map(String::as_str) != Some("test-key")
        || params.get("part").map(String::as_str) != Some("snippet,id")
        || params.get("order").map(String::as_str) != Some("date")
    {
        return (StatusCode::BAD_REQUEST, "bad query").into_response();
    }

    let max_results: usize = params
        .get("maxResults")
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    let page_size = max_results.min(channel.page_size.max(1));
    let offset: usize = params
        .get("pageToken")
        .and_then(|t| t.strip_prefix("tok-"))
        .and_then(|t| t.parse().ok())
        .unwrap_or(0);

    let end = (offset + page_size).min(channel.videos.len());
    let mut items: Vec<serde_json::Value> = channel.videos[offset..end]
        .iter()
        .map(|(id, title)| {
            json!({
                "kind": "youtube#searchResult",
                "id": { "kind": "youtube#video", "videoId": id },
                "snippet": { "title": title }
            })
        })
        .collect();
    if offset == 0 {
        for i in 0..channel.playlists {
            items.insert(
                0,
                json!({
                    "kind": "youtube#searchResult",
                    "id": { "kind": "youtube#playlist", "playlistId": format!("PL{}", i) },
                    "snippet": { "title": format!("Playlist {}", i) }
                }),
            );
        }
    }

    let mut body = json!({ "kind": "youtube#searchListResponse", "items": items });
    if end < channel.videos.len() {
        body["nextPageToken"] = json!(format!("tok-{}", end));
    }
    axum::Json(body).into_response()
}

async fn watch(
    State(channel): State<Arc<FakeChannel>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let video_id = params.get("v").cloned().unwrap_or_default();
    if !channel.videos.iter().any(|(id, _)| *id == video_id) {
        return StatusCode::NOT_FOUND.into_response();
    }
    if !channel.captions.contains_key(&video_id) {
        return watch_page_without_captions().into_response();
    }
    let track_url = format!("/timedtext?v={}&lang=en", video_id);
    watch_page(&[("en", track_url.as_str())]).into_response()
}

async fn timedtext(
    State(channel): State<Arc<FakeChannel>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match params.get("v").and_then(|id| channel.captions.get(id)) {
        Some(xml) => xml.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A minimal watch page embedding a player response with caption tracks.
/// Track URLs starting with `/` are left relative to the serving host.
pub fn watch_page(tracks: &[(&str, &str)]) -> String {
    let tracks: Vec<serde_json::Value> = tracks
        .iter()
        .map(|(lang, url)| json!({ "baseUrl": url, "languageCode": lang, "kind": "asr" }))
        .collect();
    let player = json!({
        "playabilityStatus": { "status": "OK" },
        "captions": {
            "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
        },
        "videoDetails": { "title": "irrelevant" }
    });
    format!(
        "<html><script>var ytInitialPlayerResponse = {};</script></html>",
        player
    )
}

pub fn watch_page_without_captions() -> String {
    let player = json!({
        "playabilityStatus": { "status": "OK" },
        "videoDetails": { "title": "irrelevant" }
    });
    format!(
        "<html><script>var ytInitialPlayerResponse = {};</script></html>",
        player
    )
}

/// Caption XML in the timedtext format.
pub fn timedtext_xml(entries: &[(&str, f64)]) -> String {
    let body: String = entries
        .iter()
        .map(|(text, start)| format!("<text start=\"{}\" dur=\"1.5\">{}</text>", start, text))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\" ?><transcript>{}</transcript>",
        body
    )
}

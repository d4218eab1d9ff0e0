/// Channel video listing via the YouTube Data API `search` endpoint.
///
/// Pages are requested one after another until the API stops returning a
/// `nextPageToken`. Any failing page aborts the listing.
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use scribe_shared::errors::ListingError;
use scribe_shared::models::VideoRef;

/// Largest page the search endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 50;

// ====== WIRE FORMAT ======

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl SearchResult {
    /// Only entries with a video id are videos; playlists and channels
    /// returned by the generic search are dropped.
    fn into_video(self) -> Option<VideoRef> {
        let video_id = self.id.video_id?;
        let title = self.snippet.map(|s| s.title).unwrap_or_default();
        Some(VideoRef { video_id, title })
    }
}

// ====== LISTER ======

/// Lists every video of one channel, newest first.
pub struct Lister {
    client: Client,
    api_base: String,
    api_key: String,
    channel_id: String,
    page_size: u32,
}

impl Lister {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            channel_id: channel_id.into(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Override the page size (clamped to `1..=50`).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Fetch all pages and return the videos in the order the API gave them.
    ///
    /// An empty channel is `Ok(vec![])`; a failed page is an error.
    pub async fn list_videos(&self) -> Result<Vec<VideoRef>, ListingError> {
        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page = 0;

        loop {
            page += 1;
            let response = self.fetch_page(page, page_token.as_deref()).await?;
            let before = videos.len();
            videos.extend(response.items.into_iter().filter_map(SearchResult::into_video));
            debug!(
                "Listing page {} for {}: {} videos",
                page,
                self.channel_id,
                videos.len() - before
            );

            match response.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(
            "Listed {} videos for channel {} ({} pages)",
            videos.len(),
            self.channel_id,
            page
        );
        Ok(videos)
    }

    async fn fetch_page(
        &self,
        page: usize,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, ListingError> {
        let url = format!("{}/search", self.api_base);
        let page_size = self.page_size.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.api_key.as_str()),
            ("channelId", self.channel_id.as_str()),
            ("part", "snippet,id"),
            ("order", "date"),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|source| ListingError::Request { page, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ListingError::Request { page, source })?;

        if !status.is_success() {
            // Prefer the API's own explanation when the body carries one
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            return Err(ListingError::Status {
                page,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| ListingError::Decode { page, source })
    }
}

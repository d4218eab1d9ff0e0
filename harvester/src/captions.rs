/// Caption retrieval for a single video.
///
/// The default provider scrapes the watch page for the player's caption
/// track list, picks a track, and downloads it in the timedtext XML format.
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use scribe_shared::errors::{CaptionError, FetchError};
use scribe_shared::models::CaptionEntry;

/// Source of caption tracks, one video at a time.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the ordered caption entries of `video_id`.
    async fn fetch(&self, video_id: &str) -> Result<Vec<CaptionEntry>, FetchError>;
}

// ====== WATCH PAGE ======

const CAPTIONS_MARKER: &str = "\"captions\":";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// One caption track advertised by the player.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub language_code: String,
}

/// Pull the caption track list out of a watch page.
pub fn extract_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, CaptionError> {
    let Some(idx) = html.find(CAPTIONS_MARKER) else {
        if html.contains("class=\"g-recaptcha\"") {
            return Err(CaptionError::TooManyRequests);
        }
        if !html.contains("\"playabilityStatus\":") {
            return Err(CaptionError::VideoUnavailable);
        }
        return Err(CaptionError::Disabled);
    };

    let rest = &html[idx + CAPTIONS_MARKER.len()..];
    let captions: PlayerCaptions = serde_json::Deserializer::from_str(rest)
        .into_iter::<PlayerCaptions>()
        .next()
        .ok_or_else(|| CaptionError::Malformed("empty captions object".to_string()))?
        .map_err(|e| CaptionError::Malformed(e.to_string()))?;

    let tracks = captions
        .player_captions_tracklist_renderer
        .map(|r| r.caption_tracks)
        .unwrap_or_default();
    if tracks.is_empty() {
        return Err(CaptionError::Disabled);
    }
    Ok(tracks)
}

/// Pick the track for `lang`, or the first one when no language is asked for.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    lang: Option<&str>,
) -> Result<&'a CaptionTrack, CaptionError> {
    match lang {
        Some(lang) => tracks
            .iter()
            .find(|t| t.language_code.eq_ignore_ascii_case(lang))
            .ok_or_else(|| CaptionError::LanguageUnavailable {
                requested: lang.to_string(),
                available: tracks.iter().map(|t| t.language_code.clone()).collect(),
            }),
        None => tracks.first().ok_or(CaptionError::Disabled),
    }
}

// ====== TIMEDTEXT XML ======

static TEXT_ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text\b([^>]*)>(.*?)</text>").unwrap());

static START_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bstart="([^"]*)""#).unwrap());

static DUR_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bdur="([^"]*)""#).unwrap());

fn numeric_attr(re: &Regex, attrs: &str) -> Option<f64> {
    re.captures(attrs)
        .and_then(|cap| cap[1].trim().parse::<f64>().ok())
}

/// Parse timedtext XML into caption entries, in document order.
///
/// Text is left entity-encoded; normalization happens when rendering.
pub fn parse_timedtext(xml: &str) -> Vec<CaptionEntry> {
    TEXT_ELEMENT_RE
        .captures_iter(xml)
        .map(|cap| {
            let attrs = &cap[1];
            CaptionEntry {
                text: cap[2].to_string(),
                start: numeric_attr(&START_ATTR_RE, attrs),
                duration: numeric_attr(&DUR_ATTR_RE, attrs),
            }
        })
        .collect()
}

// ====== PROVIDER ======

/// Fetches captions straight from the video platform's web endpoints.
pub struct YoutubeTranscriptProvider {
    client: Client,
    watch_base: String,
    lang: Option<String>,
}

impl YoutubeTranscriptProvider {
    pub fn new(client: Client, watch_base: impl Into<String>, lang: Option<String>) -> Self {
        Self {
            client,
            watch_base: watch_base.into(),
            lang,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, CaptionError> {
        let mut request = self.client.get(url);
        if let Some(lang) = &self.lang {
            request = request.header(reqwest::header::ACCEPT_LANGUAGE, lang.as_str());
        }
        let response = request.send().await?;
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(CaptionError::TooManyRequests),
            s if !s.is_success() => Err(CaptionError::Status(s.as_u16())),
            _ => Ok(response.text().await?),
        }
    }

    /// Track URLs are absolute on the real site; relative ones hang off the
    /// watch host.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.watch_base, url.trim_start_matches('/'))
        }
    }

    async fn fetch_entries(&self, video_id: &str) -> Result<Vec<CaptionEntry>, CaptionError> {
        let watch_url = format!("{}/watch?v={}", self.watch_base, video_id);
        let html = self.get_text(&watch_url).await?;

        let tracks = extract_caption_tracks(&html)?;
        let track = select_track(&tracks, self.lang.as_deref())?;
        debug!(
            "Video {}: using caption track {:?} of {}",
            video_id,
            track.language_code,
            tracks.len()
        );

        let xml = self.get_text(&self.resolve(&track.base_url)).await?;
        Ok(parse_timedtext(&xml))
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscriptProvider {
    async fn fetch(&self, video_id: &str) -> Result<Vec<CaptionEntry>, FetchError> {
        self.fetch_entries(video_id)
            .await
            .map_err(|source| FetchError::new(video_id, source))
    }
}

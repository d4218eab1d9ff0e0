/// Unified error types for the Scribe system.
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a harvest run.
///
/// Only failures that make the whole run pointless end up here. Per-video
/// failures ([`FetchError`], [`WriteError`]) are logged and skipped.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// A page of the channel listing could not be retrieved.
///
/// `page` is 1-based. Pages after the failing one are never requested.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("page {page}: request failed: {source}")]
    Request {
        page: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("page {page}: API returned HTTP {status}: {message}")]
    Status {
        page: usize,
        status: u16,
        message: String,
    },

    #[error("page {page}: undecodable response: {source}")]
    Decode {
        page: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl ListingError {
    /// The 1-based page number that failed.
    pub fn page(&self) -> usize {
        match self {
            ListingError::Request { page, .. }
            | ListingError::Status { page, .. }
            | ListingError::Decode { page, .. } => *page,
        }
    }
}

/// Why a caption track could not be retrieved.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("too many requests, captcha wall served")]
    TooManyRequests,

    #[error("video is no longer available")]
    VideoUnavailable,

    #[error("captions are disabled for this video")]
    Disabled,

    #[error("no captions in language {requested:?} (available: {})", .available.join(", "))]
    LanguageUnavailable {
        requested: String,
        available: Vec<String>,
    },

    #[error("malformed watch page: {0}")]
    Malformed(String),
}

/// Caption retrieval failed for one video.
#[derive(Debug, Error)]
#[error("captions for {video_id}: {source}")]
pub struct FetchError {
    pub video_id: String,
    #[source]
    pub source: CaptionError,
}

impl FetchError {
    pub fn new(video_id: impl Into<String>, source: CaptionError) -> Self {
        Self {
            video_id: video_id.into(),
            source,
        }
    }
}

/// A transcript file could not be written.
#[derive(Debug, Error)]
#[error("writing {}: {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Result type alias for harvest runs.
pub type HarvestResult<T> = Result<T, HarvestError>;

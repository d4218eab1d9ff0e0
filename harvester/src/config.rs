/// Harvester configuration, read from the process environment.
use std::path::PathBuf;
use std::time::Duration;

use scribe_shared::errors::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_WATCH_BASE: &str = "https://www.youtube.com";
pub const DEFAULT_TRANSCRIPTS_DIR: &str = "transcripts";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub channel_id: String,
    pub api_base: String,
    pub watch_base: String,
    pub transcripts_dir: PathBuf,
    /// Preferred caption language code. First available track when unset.
    pub caption_lang: Option<String>,
    pub http_timeout: Duration,
    pub page_size: u32,
}

impl Config {
    /// Read configuration from environment variables (`.env` already loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("YOUTUBE_API_KEY").ok_or(ConfigError::Missing("YOUTUBE_API_KEY"))?;
        let channel_id =
            get("YOUTUBE_CHANNEL_ID").ok_or(ConfigError::Missing("YOUTUBE_CHANNEL_ID"))?;

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    })
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let page_size = match get("LISTING_PAGE_SIZE") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if (1..=50).contains(&n) => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "LISTING_PAGE_SIZE",
                        value: raw,
                        reason: "must be between 1 and 50".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "LISTING_PAGE_SIZE",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            api_key,
            channel_id,
            api_base: get("YOUTUBE_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            watch_base: get("YOUTUBE_WATCH_BASE")
                .unwrap_or_else(|| DEFAULT_WATCH_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            transcripts_dir: PathBuf::from(
                get("TRANSCRIPTS_DIR").unwrap_or_else(|| DEFAULT_TRANSCRIPTS_DIR.to_string()),
            ),
            caption_lang: get("CAPTION_LANG"),
            http_timeout: Duration::from_secs(http_timeout_secs),
            page_size,
        })
    }
}

//! Data models shared across Scribe crates.

/// A video on the channel, as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub video_id: String,
    /// Raw display title. May contain any Unicode or punctuation.
    pub title: String,
}

impl VideoRef {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
        }
    }
}

/// A single timed caption fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionEntry {
    /// Raw text, possibly HTML-entity encoded (sometimes twice).
    pub text: String,
    /// Start offset in seconds.
    pub start: Option<f64>,
    /// Display duration in seconds.
    pub duration: Option<f64>,
}

impl CaptionEntry {
    pub fn new(text: impl Into<String>, start: Option<f64>) -> Self {
        Self {
            text: text.into(),
            start,
            duration: None,
        }
    }
}

/// Outcome counters for one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub listed: usize,
    pub written: usize,
    pub fetch_failed: usize,
    pub write_failed: usize,
}

impl RunSummary {
    /// Videos that did not end up with a transcript file.
    pub fn skipped(&self) -> usize {
        self.fetch_failed + self.write_failed
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} listed, {} written, {} fetch failures, {} write failures",
            self.listed, self.written, self.fetch_failed, self.write_failed
        )
    }
}

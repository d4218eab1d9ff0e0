/// Harvest pipeline: list the channel, then fetch and write each video's
/// transcript, one video at a time.
use std::path::PathBuf;

use tracing::{error, info, warn};

use scribe_shared::errors::HarvestResult;
use scribe_shared::models::RunSummary;

use crate::captions::TranscriptProvider;
use crate::lister::Lister;
use crate::writer::{ensure_output_dir, write_transcript};

pub struct Harvester<P> {
    lister: Lister,
    provider: P,
    output_dir: PathBuf,
}

impl<P: TranscriptProvider> Harvester<P> {
    pub fn new(lister: Lister, provider: P, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            lister,
            provider,
            output_dir: output_dir.into(),
        }
    }

    /// Run one harvest.
    ///
    /// Fails only when the listing fails or the output directory cannot be
    /// created. A video whose captions cannot be fetched or written is
    /// logged, counted, and skipped.
    pub async fn run(&self) -> HarvestResult<RunSummary> {
        let videos = match self.lister.list_videos().await {
            Ok(videos) => videos,
            Err(e) => {
                error!("Listing aborted at page {}: {}", e.page(), e);
                return Err(e.into());
            }
        };
        let mut summary = RunSummary {
            listed: videos.len(),
            ..Default::default()
        };

        if videos.is_empty() {
            info!("Channel has no videos, nothing to do");
            return Ok(summary);
        }

        ensure_output_dir(&self.output_dir).await?;

        let total = videos.len();
        for (i, video) in videos.into_iter().enumerate() {
            info!("[{}/{}] {} ({})", i + 1, total, video.title, video.video_id);

            let entries = match self.provider.fetch(&video.video_id).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Skipping video {}: {}", e.video_id, e.source);
                    summary.fetch_failed += 1;
                    continue;
                }
            };

            match write_transcript(&self.output_dir, &video, entries).await {
                Ok(path) => {
                    info!("Saved transcript to {}", path.display());
                    summary.written += 1;
                }
                Err(e) => {
                    error!("Skipping video {}: {}", video.video_id, e);
                    summary.write_failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

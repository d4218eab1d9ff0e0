/// Scribe Harvester
///
/// Lists every video on a YouTube channel and saves each video's captions
/// as a timestamped text file, one file per video.
mod captions;
mod config;
mod lister;
mod pipeline;
mod writer;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use tracing::{info, warn};

use captions::YoutubeTranscriptProvider;
use config::Config;
use lister::Lister;
use pipeline::Harvester;

const USER_AGENT: &str = concat!("scribe-harvester/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe_harvester=info,scribe_shared=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Harvesting channel {} into {}",
        config.channel_id,
        config.transcripts_dir.display()
    );

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let lister = Lister::new(
        client.clone(),
        config.api_base.clone(),
        config.api_key.clone(),
        config.channel_id.clone(),
    )
    .with_page_size(config.page_size);
    let provider = YoutubeTranscriptProvider::new(
        client,
        config.watch_base.clone(),
        config.caption_lang.clone(),
    );

    let summary = Harvester::new(lister, provider, config.transcripts_dir.clone())
        .run()
        .await
        .context("Harvest aborted")?;

    info!("Done: {}", summary);
    if summary.skipped() > 0 {
        warn!("{} videos have no transcript this run", summary.skipped());
    }
    Ok(())
}

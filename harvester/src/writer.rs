/// Transcript file output.
///
/// Files are written to a temporary sibling and renamed into place, so a
/// failed write never leaves a truncated transcript behind.
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use scribe_shared::errors::{HarvestError, WriteError};
use scribe_shared::models::{CaptionEntry, VideoRef};
use scribe_shared::transcript::{file_stem, render_transcript};

/// Create the output directory if it does not exist yet.
pub async fn ensure_output_dir(dir: &Path) -> Result<(), HarvestError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| HarvestError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Path of a video's transcript inside `dir`.
pub fn transcript_path(dir: &Path, video: &VideoRef) -> PathBuf {
    dir.join(format!("{}.txt", file_stem(video)))
}

/// Render `entries` and write them to the video's transcript file,
/// replacing any previous version. Returns the final path.
pub async fn write_transcript(
    dir: &Path,
    video: &VideoRef,
    entries: Vec<CaptionEntry>,
) -> Result<PathBuf, WriteError> {
    let path = transcript_path(dir, video);
    let content = render_transcript(entries);
    write_atomic(&path, content.as_bytes()).await?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}

async fn write_atomic(path: &Path, content: &[u8]) -> Result<(), WriteError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    if let Err(source) = write_then_rename(&tmp, path, content).await {
        // Best effort; the tmp file may never have been created
        let _ = fs::remove_file(&tmp).await;
        return Err(WriteError {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

async fn write_then_rename(tmp: &Path, path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp, path).await
}

//! Transient staging of uploaded audio between receipt and transcription.

use std::path::{Path, PathBuf};

use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, warn};

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/webm" => Some("webm"),
        "audio/ogg" => Some("ogg"),
        "audio/mp4" | "audio/m4a" => Some("m4a"),
        _ => None,
    }
}

/// Collision-resistant name for a staged file: timestamp plus a random
/// suffix, so concurrent uploads never overwrite each other.
pub fn staged_filename(mime: &str) -> String {
    let millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = ext_from_mime(mime).unwrap_or("bin");
    format!("audio-{millis}-{suffix}.{ext}")
}

/// Write the uploaded bytes under `dir`, creating it if needed. Returns the
/// path of the staged file.
pub async fn stage(dir: &Path, audio: &[u8], mime: &str) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(staged_filename(mime));
    tokio::fs::write(&path, audio).await?;
    debug!(path = %path.display(), bytes = audio.len(), "upload staged");
    Ok(path)
}

/// Remove a staged file. Best effort: a leftover file is an operational
/// concern, not a correctness one.
pub async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to remove staged file");
    }
}

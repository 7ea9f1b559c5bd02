//! Speech-to-text provider capability.
//!
//! The rest of the app only sees the [`Transcriber`] trait; the concrete
//! Deepgram adapter lives in [`deepgram`] and any other vendor SDK would be
//! another adapter implementing the same trait.

pub mod deepgram;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use deepgram::DeepgramClient;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("provider request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("provider response missing transcript")]
    EmptyResponse,
}

/// Opaque transcription function: audio bytes in, transcript text out.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one encoded audio clip. `mime` is the declared content type
    /// of the bytes (e.g. `audio/wav`).
    async fn transcribe(&self, audio: Bytes, mime: &str) -> Result<String, TranscribeError>;
}

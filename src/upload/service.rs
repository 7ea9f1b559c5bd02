use anyhow::Context;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use super::staging;
use crate::state::AppState;
use crate::store::Transcript;

/// Run the upload pipeline for one audio clip: stage the bytes, forward them
/// to the transcription provider, persist the transcript for the owning user
/// and remove the staged file. The staged file is removed on the error paths
/// too, so a provider failure leaves nothing behind.
pub async fn process_upload(
    state: &AppState,
    user_id: Uuid,
    audio: Bytes,
    mime: &str,
) -> anyhow::Result<Transcript> {
    let path = staging::stage(&state.config.upload_dir, &audio, mime)
        .await
        .context("stage upload")?;

    // Forward the staged content, not the in-flight buffer, so what gets
    // transcribed is exactly what was written.
    let staged = match tokio::fs::read(&path).await {
        Ok(b) => Bytes::from(b),
        Err(e) => {
            staging::discard(&path).await;
            return Err(anyhow::Error::from(e).context("read staged file"));
        }
    };

    let text = match state.transcriber.transcribe(staged, mime).await {
        Ok(t) => t,
        Err(e) => {
            staging::discard(&path).await;
            return Err(anyhow::Error::from(e).context("transcribe audio"));
        }
    };

    let record = match state.transcripts.insert(user_id, &text).await {
        Ok(r) => r,
        Err(e) => {
            staging::discard(&path).await;
            return Err(e.context("persist transcript"));
        }
    };

    staging::discard(&path).await;
    info!(user_id = %user_id, transcript_id = %record.id, "upload transcribed");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::fakes::FailingTranscriber;

    fn staged_count(state: &AppState) -> usize {
        std::fs::read_dir(&state.config.upload_dir)
            .map(|d| d.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn success_persists_transcript_and_cleans_staging() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();

        let record = process_upload(&state, user_id, Bytes::from_static(b"RIFF"), "audio/wav")
            .await
            .expect("pipeline should succeed");

        assert_eq!(record.text, "hello world");
        assert_eq!(record.user_id, user_id);
        assert_eq!(staged_count(&state), 0);

        let listed = state.transcripts.list_by_user(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, record.id);
    }

    #[tokio::test]
    async fn provider_failure_creates_nothing_and_cleans_staging() {
        let state = AppState::fake_with_transcriber(Arc::new(FailingTranscriber));
        let user_id = Uuid::new_v4();

        let err = process_upload(&state, user_id, Bytes::from_static(b"RIFF"), "audio/wav")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("transcribe"));

        assert_eq!(staged_count(&state), 0);
        assert!(state
            .transcripts
            .list_by_user(user_id)
            .await
            .unwrap()
            .is_empty());
    }
}

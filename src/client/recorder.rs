use bytes::Bytes;
use thiserror::Error;

use super::api::{ApiClient, ClientError};
use crate::store::Transcript;

/// Opaque audio capture device: started, then stopped to yield one encoded
/// clip and its MIME type. The real microphone lives behind this seam.
pub trait AudioSource {
    fn start(&mut self) -> anyhow::Result<()>;
    fn stop(&mut self) -> anyhow::Result<(Bytes, String)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Uploading,
}

#[derive(Debug, Error)]
pub enum RecorderError {
    /// Starting while a recording is active is rejected rather than left
    /// undefined.
    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("no recording in progress")]
    NotRecording,

    #[error("audio capture failed: {0}")]
    Capture(#[source] anyhow::Error),

    #[error(transparent)]
    Upload(#[from] ClientError),
}

/// Record/upload widget state machine: Idle -> Recording on start,
/// Recording -> Uploading once capture stops (the clip is forwarded
/// immediately), and back to Idle when the server responds either way.
pub struct Recorder<S: AudioSource> {
    source: S,
    state: RecorderState,
}

impl<S: AudioSource> Recorder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RecorderState::Idle,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn start(&mut self) -> Result<(), RecorderError> {
        match self.state {
            RecorderState::Recording | RecorderState::Uploading => {
                return Err(RecorderError::AlreadyRecording)
            }
            RecorderState::Idle => {}
        }
        // Capture failure (e.g. no microphone permission) leaves us Idle.
        self.source.start().map_err(RecorderError::Capture)?;
        self.state = RecorderState::Recording;
        Ok(())
    }

    pub async fn stop_and_upload(
        &mut self,
        api: &ApiClient,
        token: &str,
    ) -> Result<Transcript, RecorderError> {
        if self.state != RecorderState::Recording {
            return Err(RecorderError::NotRecording);
        }

        let (audio, mime) = match self.source.stop() {
            Ok(clip) => clip,
            Err(e) => {
                self.state = RecorderState::Idle;
                return Err(RecorderError::Capture(e));
            }
        };

        self.state = RecorderState::Uploading;
        let result = api.upload(token, audio, &mime).await;
        self.state = RecorderState::Idle;
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeMic {
        started: bool,
        fail_start: bool,
    }

    impl FakeMic {
        fn new() -> Self {
            Self {
                started: false,
                fail_start: false,
            }
        }
    }

    impl AudioSource for FakeMic {
        fn start(&mut self) -> anyhow::Result<()> {
            anyhow::ensure!(!self.fail_start, "permission denied");
            self.started = true;
            Ok(())
        }

        fn stop(&mut self) -> anyhow::Result<(Bytes, String)> {
            anyhow::ensure!(self.started, "not capturing");
            self.started = false;
            Ok((Bytes::from_static(b"RIFF"), "audio/wav".into()))
        }
    }

    #[test]
    fn start_while_recording_is_rejected() {
        let mut recorder = Recorder::new(FakeMic::new());
        recorder.start().unwrap();
        assert_eq!(recorder.state(), RecorderState::Recording);
        assert!(matches!(
            recorder.start(),
            Err(RecorderError::AlreadyRecording)
        ));
        assert_eq!(recorder.state(), RecorderState::Recording);
    }

    #[test]
    fn capture_failure_stays_idle() {
        let mut mic = FakeMic::new();
        mic.fail_start = true;
        let mut recorder = Recorder::new(mic);
        assert!(matches!(recorder.start(), Err(RecorderError::Capture(_))));
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn stop_without_start_is_rejected() {
        let mut recorder = Recorder::new(FakeMic::new());
        let api = ApiClient::new("http://127.0.0.1:1");
        assert!(matches!(
            recorder.stop_and_upload(&api, "tok").await,
            Err(RecorderError::NotRecording)
        ));
    }

    #[tokio::test]
    async fn failed_upload_returns_to_idle() {
        let mut recorder = Recorder::new(FakeMic::new());
        recorder.start().unwrap();
        // Nothing listens on port 1; the upload fails but the widget resets.
        let api = ApiClient::new("http://127.0.0.1:1");
        let err = recorder.stop_and_upload(&api, "tok").await.unwrap_err();
        assert!(matches!(err, RecorderError::Upload(_)));
        assert_eq!(recorder.state(), RecorderState::Idle);
    }
}

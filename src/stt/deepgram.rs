use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use super::{TranscribeError, Transcriber};
use crate::config::DeepgramConfig;

/// Client for Deepgram's pre-recorded transcription API.
///
/// Sends the raw audio body to `POST /v1/listen` with fixed options:
/// punctuation on, smart formatting on, the configured model and a language
/// hint.
pub struct DeepgramClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    language: String,
}

impl DeepgramClient {
    pub fn new(config: &DeepgramConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            language: config.language.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}

fn extract_transcript(response: ListenResponse) -> Result<String, TranscribeError> {
    response
        .results
        .and_then(|r| r.channels.into_iter().next())
        .and_then(|c| c.alternatives.into_iter().next())
        .map(|a| a.transcript)
        .ok_or(TranscribeError::EmptyResponse)
}

#[async_trait]
impl Transcriber for DeepgramClient {
    async fn transcribe(&self, audio: Bytes, mime: &str) -> Result<String, TranscribeError> {
        let url = format!("{}/v1/listen", self.base_url);
        let response = self
            .http
            .post(&url)
            .query(&[
                ("model", self.model.as_str()),
                ("punctuate", "true"),
                ("smart_format", "true"),
                ("language", self.language.as_str()),
            ])
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.api_key))
            .header(reqwest::header::CONTENT_TYPE, mime)
            .body(audio)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api { status, body });
        }

        let parsed: ListenResponse = response.json().await?;
        let text = extract_transcript(parsed)?;
        debug!(chars = text.len(), "transcript received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_alternative_transcript() {
        let raw = serde_json::json!({
            "results": {
                "channels": [
                    { "alternatives": [ { "transcript": "hello world" } ] }
                ]
            }
        });
        let parsed: ListenResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(extract_transcript(parsed).unwrap(), "hello world");
    }

    #[test]
    fn missing_channels_is_an_empty_response() {
        let raw = serde_json::json!({ "results": { "channels": [] } });
        let parsed: ListenResponse = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            extract_transcript(parsed),
            Err(TranscribeError::EmptyResponse)
        ));
    }

    #[test]
    fn missing_results_is_an_empty_response() {
        let parsed: ListenResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            extract_transcript(parsed),
            Err(TranscribeError::EmptyResponse)
        ));
    }
}

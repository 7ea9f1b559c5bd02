use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::Transcript;
use crate::upload::staging::ext_from_mime;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// 401 from any protected call: the session is no longer valid and the
    /// caller should return to login.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("{message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
}

/// Token plus the cached user profile snapshot kept alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

/// Thin typed wrapper over the server's HTTP surface.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            Err(ClientError::Unauthorized(message))
        } else {
            Err(ClientError::Api { status, message })
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Profile, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Upload one recorded clip as the multipart field "audio".
    pub async fn upload(
        &self,
        token: &str,
        audio: Bytes,
        mime: &str,
    ) -> Result<Transcript, ClientError> {
        let filename = format!("recorded_audio.{}", ext_from_mime(mime).unwrap_or("bin"));
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename)
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .http
            .post(self.url("/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn list(&self, token: &str) -> Result<Vec<Transcript>, ClientError> {
        let response = self
            .http
            .get(self.url("/transcriptions"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn clear_history(&self, token: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .delete(self.url("/transcriptions"))
            .bearer_auth(token)
            .send()
            .await?;
        let body: serde_json::Value = Self::check(response).await?.json().await?;
        Ok(body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string())
    }
}

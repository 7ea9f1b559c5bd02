use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepgramConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub deepgram: DeepgramConfig,
    /// Transient directory where uploads are staged between receipt and
    /// transcription.
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "voxnote".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "voxnote-users".into()),
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };
        let deepgram = DeepgramConfig {
            api_key: std::env::var("DEEPGRAM_API_KEY")?,
            base_url: std::env::var("DEEPGRAM_BASE_URL")
                .unwrap_or_else(|_| "https://api.deepgram.com".into()),
            model: std::env::var("DEEPGRAM_MODEL").unwrap_or_else(|_| "nova-3".into()),
            language: std::env::var("DEEPGRAM_LANGUAGE").unwrap_or_else(|_| "en-IN".into()),
        };
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("recorded"));
        Ok(Self {
            database_url,
            jwt,
            deepgram,
            upload_dir,
        })
    }
}

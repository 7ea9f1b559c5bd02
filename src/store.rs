use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transcript {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Persistence capability for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User>;
}

/// Persistence capability for transcript records. Transcripts are immutable:
/// they are inserted once, listed newest-first, and only ever bulk-deleted
/// per user.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, text: &str) -> anyhow::Result<Transcript>;
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Transcript>>;
    async fn delete_all_by_user(&self, user_id: Uuid) -> anyhow::Result<u64>;
}

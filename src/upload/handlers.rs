use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, instrument};

use super::service::process_upload;
use crate::{auth::CurrentUser, state::AppState, store::Transcript};

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// POST /upload (multipart, field "audio")
#[instrument(skip(state, user, mp))]
pub async fn upload(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut mp: Multipart,
) -> Result<Json<Transcript>, (StatusCode, String)> {
    let mut audio: Option<(Bytes, String)> = None;
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some("audio") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            audio = Some((data, content_type));
            break;
        }
    }

    let Some((data, content_type)) = audio else {
        return Err((StatusCode::BAD_REQUEST, "No audio file uploaded".into()));
    };

    let record = process_upload(&state, user.id, data, &content_type)
        .await
        .map_err(|e| {
            // Cause stays server-side; the caller only sees a generic message.
            error!(error = %e, user_id = %user.id, "upload pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process audio file".into(),
            )
        })?;

    Ok(Json(record))
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{auth::CurrentUser, state::AppState, store::Transcript};

pub fn transcript_routes() -> Router<AppState> {
    Router::new().route("/transcriptions", get(list).delete(clear_history))
}

/// GET /transcriptions — the caller's transcripts, newest first.
#[instrument(skip(state, user))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Transcript>>, (StatusCode, String)> {
    let records = state
        .transcripts
        .list_by_user(user.id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "list transcripts failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch transcriptions".into(),
            )
        })?;
    Ok(Json(records))
}

/// DELETE /transcriptions — irreversible bulk delete of the caller's history.
#[instrument(skip(state, user))]
pub async fn clear_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let deleted = state
        .transcripts
        .delete_all_by_user(user.id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "clear history failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to clear transcription history".into(),
            )
        })?;
    info!(user_id = %user.id, deleted, "transcription history cleared");
    Ok(Json(serde_json::json!({
        "message": "Transcription history cleared"
    })))
}

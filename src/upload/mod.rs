use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod service;
pub mod staging;

pub fn router() -> Router<AppState> {
    handlers::upload_routes()
}

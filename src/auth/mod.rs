use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use jwt::{CurrentUser, JwtKeys, TokenError};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}

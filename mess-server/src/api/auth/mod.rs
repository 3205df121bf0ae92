//! Authentication Routes
//!
//! - /api/auth/register, /api/auth/login: public (no auth required)
//! - /api/auth/me: protected (require auth)
//! - /api/auth/logout: idempotent, works with or without a session

mod handler;

use axum::routing::{get, post};
use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/logout", post(handler::logout))
        .route("/api/auth/me", get(handler::me))
}

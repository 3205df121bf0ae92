//! Feedback API 模块
//!
//! 所有反馈接口都要求登录（全局认证中间件负责拦截）。

mod handler;

use axum::routing::{get, post};
use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/feedback", post(handler::submit))
        .route("/api/feedback/mine/{item_id}", get(handler::mine))
}

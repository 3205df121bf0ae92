//! Upload Routes
//!
//! 图片上传仅限 staff；已存图片经 /uploads/images 静态目录公开访问。

mod handler;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{middleware, Router};

use crate::auth::require_staff;
use crate::core::ServerState;
use crate::services::image_store::MAX_FILE_SIZE;

/// Extra room on top of the image cap for multipart boundaries and headers
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload/image", post(handler::upload))
        // Default axum body limit is 2MB, below the documented image cap
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD))
        .layer(middleware::from_fn(require_staff))
}

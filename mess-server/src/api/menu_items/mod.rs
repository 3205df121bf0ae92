//! Menu Item API 模块
//!
//! 读操作公开，写操作要求 staff 角色（叠加在全局认证中间件之上）。

mod handler;

use axum::routing::get;
use axum::{middleware, Router};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let write_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_staff));

    read_routes.merge(write_routes)
}

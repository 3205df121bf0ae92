//! 页面路由与访问守卫
//!
//! 单页应用的 HTML 壳由服务器统一返回，前端路由在浏览器里接管。
//! 守卫语义在这里落实：
//!
//! | 页面 | 要求 | 未登录 | 非 staff |
//! |------|------|--------|----------|
//! | /, /menu, /login, /register | 无 | - | - |
//! | /feedback, /account | 登录 | 303 /login?returnTo=… | - |
//! | /dashboard, /add-menu-item, /edit-menu-item/{id} | staff | 303 /login?returnTo=… | 303 / |
//!
//! 重定向用 303，浏览器总是以 GET 跟随。

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::auth::{session_from_headers, CurrentUser};
use crate::core::ServerState;

/// 前端壳页面，编译期内嵌
const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(shell))
        .route("/menu", get(shell))
        .route("/login", get(shell))
        .route("/register", get(shell))
        .route("/feedback", get(authed_page))
        .route("/account", get(authed_page))
        .route("/dashboard", get(staff_page))
        .route("/add-menu-item", get(staff_page))
        .route("/edit-menu-item/{id}", get(staff_page))
        .fallback(not_found)
}

async fn shell() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// 兜底 404 页面（仍由壳渲染，但状态码为 404）
async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "Page not found");
    (StatusCode::NOT_FOUND, Html(INDEX_HTML)).into_response()
}

/// 登录用户可访问的页面
async fn authed_page(
    State(state): State<ServerState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    match session_from_headers(&state, &headers) {
        Some(_) => Html(INDEX_HTML).into_response(),
        None => redirect_to_login(&uri),
    }
}

/// 仅 staff 可访问的页面
async fn staff_page(State(state): State<ServerState>, headers: HeaderMap, uri: Uri) -> Response {
    match session_from_headers(&state, &headers) {
        None => redirect_to_login(&uri),
        Some(user) if !user.is_staff() => redirect_home(&user, &uri),
        Some(_) => Html(INDEX_HTML).into_response(),
    }
}

fn redirect_to_login(uri: &Uri) -> Response {
    // Keep the query string so e.g. /feedback?menuItemId=… survives the login
    let return_to = match uri.query() {
        Some(query) => format!("{}?{}", uri.path(), query),
        None => uri.path().to_string(),
    };
    let target = format!("/login?returnTo={}", urlencoding::encode(&return_to));
    Redirect::to(&target).into_response()
}

fn redirect_home(user: &CurrentUser, uri: &Uri) -> Response {
    tracing::warn!(user_id = %user.id, path = %uri.path(), "Non-staff user hit staff page");
    Redirect::to("/").into_response()
}

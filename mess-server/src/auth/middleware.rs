//! 认证中间件
//!
//! 为 JWT 认证和角色授权提供 Axum 中间件。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, Method};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// 会话 Cookie 名（页面路由守卫读取）
pub const AUTH_COOKIE: &str = "auth_token";

/// 从请求头提取令牌
///
/// 优先 `Authorization: Bearer <token>`，其次 `auth_token` Cookie
/// （浏览器页面导航不带 Authorization 头）。
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        && let Some(token) = JwtService::extract_from_header(header)
    {
        return Some(token.to_string());
    }

    headers
        .get(http::header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == AUTH_COOKIE && !value.is_empty()).then(|| value.to_string())
            })
        })
}

/// 解析请求中的会话，失败返回 None（页面守卫用）
pub fn session_from_headers(state: &ServerState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = token_from_headers(headers)?;
    state
        .jwt_service
        .validate_token(&token)
        .ok()
        .map(CurrentUser::from)
}

/// 认证中间件 - 要求 API 调用者登录
///
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径（页面路由自带守卫）
/// - `/api/health`
/// - `/api/auth/login`, `/api/auth/register`, `/api/auth/logout`
/// - `GET /api/menu*`（菜单浏览是公开的）
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过（页面路由有自己的守卫与重定向语义）
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let token = match token_from_headers(req.headers()) {
        Some(t) => t,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without credentials");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt_service.validate_token(&token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

fn is_public_api_route(method: &Method, path: &str) -> bool {
    if path == "/api/health"
        || path == "/api/auth/login"
        || path == "/api/auth/register"
        || path == "/api/auth/logout"
    {
        return true;
    }
    // 菜单浏览公开；写操作仍需认证
    method == Method::GET && (path == "/api/menu" || path.starts_with("/api/menu/"))
}

/// 授权中间件 - 要求 staff 角色
///
/// 必须叠放在 [`require_auth`] 之内（依赖已注入的 [`CurrentUser`]）。
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if !user.is_staff() {
        tracing::warn!(user_id = %user.id, uri = %req.uri(), "Non-staff user hit staff route");
        return Err(AppError::forbidden(
            "Only mess workers can manage menu items",
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{AUTHORIZATION, COOKIE};

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer header-token".parse().unwrap());
        headers.insert(COOKIE, "auth_token=cookie-token".parse().unwrap());
        assert_eq!(token_from_headers(&headers).as_deref(), Some("header-token"));
    }

    #[test]
    fn cookie_token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "theme=dark; auth_token=abc.def.ghi; lang=en".parse().unwrap(),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_credentials_yield_none() {
        let headers = HeaderMap::new();
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn menu_reads_are_public_but_writes_are_not() {
        assert!(is_public_api_route(&Method::GET, "/api/menu"));
        assert!(is_public_api_route(&Method::GET, "/api/menu/menu_item:1"));
        assert!(!is_public_api_route(&Method::POST, "/api/menu"));
        assert!(!is_public_api_route(&Method::DELETE, "/api/menu/menu_item:1"));
        assert!(!is_public_api_route(&Method::GET, "/api/feedback"));
        assert!(is_public_api_route(&Method::POST, "/api/auth/logout"));
    }
}

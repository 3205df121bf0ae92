//! Authentication Handlers
//!
//! Handles registration, login, logout and session introspection.

use std::time::Duration;

use axum::extract::{Extension, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use validator::Validate;

use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::ApiResponse;

use crate::auth::{CurrentUser, AUTH_COOKIE};
use crate::core::ServerState;
use crate::db::models::ProfileCreate;
use crate::db::repository::RepoError;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

fn login_response(state: &ServerState, data: LoginResponse) -> Response {
    let max_age = state.config.jwt.expiration_minutes * 60;
    let cookie = session_cookie(&data.token, max_age);
    (
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok(data)),
    )
        .into_response()
}

/// POST /api/auth/register - 注册新用户
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Response> {
    req.validate()?;

    let profile = state
        .profiles
        .create(ProfileCreate {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => {
                AppError::conflict_field("email", "An account with this email already exists")
            }
            other => other.into(),
        })?;

    let user = profile.to_user_info();
    let token = state
        .jwt_service
        .generate_token(&user.id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(login_response(&state, LoginResponse { token, user }))
}

/// POST /api/auth/login - 登录
///
/// 统一的错误消息防止用户名枚举；固定延迟防止时序攻击。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    req.validate()?;

    let profile = state.profiles.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let profile = match profile {
        Some(p) => {
            let password_valid = p
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            p
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - unknown email");
            return Err(AppError::invalid_credentials());
        }
    };

    let user = profile.to_user_info();
    let token = state
        .jwt_service
        .generate_token(&user.id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    Ok(login_response(&state, LoginResponse { token, user }))
}

/// POST /api/auth/logout - 登出
///
/// JWT 本身无状态；清除会话 cookie 即可。对未登录请求也幂等成功。
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, session_cookie("", 0))],
        Json(ApiResponse::ok(())),
    )
        .into_response()
}

/// GET /api/auth/me - 当前用户信息
///
/// 从数据库重读，保证 email/created_at 等非令牌字段是新鲜的。
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let profile = state
        .profiles
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;

    Ok(Json(ApiResponse::ok(profile.to_user_info())))
}

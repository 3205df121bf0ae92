//! 统一错误处理
//!
//! 应用级错误类型与 HTTP 映射：
//! - [`AppError`] - 应用错误枚举
//! - 所有接口错误都序列化为 `shared::ApiResponse` 信封
//!
//! # 错误分类
//!
//! | 分类 | HTTP | 说明 |
//! |------|------|------|
//! | 校验错误 | 400 | 字段级，阻止提交，不触达仓储层 |
//! | 预期的业务失败 | 400/404/409 | 凭证错误、重复邮箱、资源不存在 |
//! | 认证/权限 | 401/403 | 未登录、令牌失效、角色不足 |
//! | 系统错误 | 500 | 数据库/内部错误，细节只进日志 |

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::response::{ApiResponse, field_errors_from};
use tracing::error;
use validator::ValidationErrors;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // ========== 权限错误 (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 资源冲突 (409)，可选字段作用域（如重复邮箱挂在 `email` 上）
    #[error("Conflict: {message}")]
    Conflict {
        field: Option<String>,
        message: String,
    },

    /// 单字段校验失败 (400)
    #[error("Validation failed: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// 整表单校验失败 (400)，携带 validator 的全部字段错误
    #[error("Validation failed")]
    Form(ValidationErrors),

    /// 无效请求 (400)，统一文案（如登录凭证错误，防枚举）
    #[error("Invalid request: {0}")]
    Invalid(String),

    // ========== 系统错误 (500) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict {
            field: None,
            message: msg.into(),
        }
    }

    /// Conflict scoped to a form field (duplicate email and the like)
    pub fn conflict_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Conflict {
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: msg.into(),
        }
    }

    /// Validation failure scoped to a form field
    pub fn field_validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 统一的凭证错误文案，防止邮箱枚举
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, ApiResponse<()>) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::error("Please log in first"),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::error("Token expired"),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::error("Invalid token"),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiResponse::error(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::error(msg)),
            AppError::Conflict { field, message } => {
                let body = match field {
                    Some(f) => ApiResponse::field_error(f, message),
                    None => ApiResponse::error(message),
                };
                (StatusCode::CONFLICT, body)
            }
            AppError::Validation { field, message } => {
                let body = match field {
                    Some(f) => ApiResponse::field_error(f, message),
                    None => ApiResponse::error(message),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Form(errors) => {
                let mut body = ApiResponse::error("Validation failed");
                body.field_errors = field_errors_from(errors);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, ApiResponse::error(msg)),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("Database error"),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Form(errors)
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::validation(format!("Invalid multipart request: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_field_carries_the_field_scope() {
        let err = AppError::conflict_field("email", "Email is already registered");
        match err {
            AppError::Conflict { field, message } => {
                assert_eq!(field.as_deref(), Some("email"));
                assert_eq!(message, "Email is already registered");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn invalid_credentials_uses_unified_message() {
        assert_eq!(
            AppError::invalid_credentials().to_string(),
            "Invalid request: Invalid email or password"
        );
    }
}

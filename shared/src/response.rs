//! API Response types
//!
//! 统一的 API 响应结构：所有接口都返回 `{ success, data, error }`，
//! 表单校验失败时额外携带字段级错误列表。

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// A single field-scoped validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Unified API response structure
///
/// ```json
/// {
///     "success": true,
///     "data": { ... }
/// }
/// ```
///
/// Failures carry `error` and, for form validation, `field_errors`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field_errors: Vec::new(),
        }
    }

    /// Create a generic error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field_errors: Vec::new(),
        }
    }

    /// Create an error response scoped to a single field
    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            data: None,
            error: Some(message.clone()),
            field_errors: vec![FieldError {
                field: field.into(),
                message,
            }],
        }
    }

    /// Create an error response from validator output
    pub fn validation(errors: &ValidationErrors) -> Self {
        let field_errors = field_errors_from(errors);
        Self {
            success: false,
            data: None,
            error: Some("Validation failed".to_string()),
            field_errors,
        }
    }
}

/// Flatten [`ValidationErrors`] into `{field, message}` pairs
///
/// 每个字段取 validator 的 message（schema 中声明的提示文案），
/// 没有 message 时退化为错误码。
pub fn field_errors_from(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    // Deterministic order for clients and tests
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

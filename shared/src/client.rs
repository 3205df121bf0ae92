//! Client-facing request/response types
//!
//! Common request/response types used in API communication, together with
//! their declarative validation schemas. Validation runs before any handler
//! logic; failures are field-scoped and never reach the repositories.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::{MealType, NutritionalInfo, Role};

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Registration request
///
/// 跨字段校验（两次密码一致）挂在 `confirm_password` 上。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = validate_password_policy)
    )]
    pub password: String,
    #[validate(must_match(other = password, message = "Passwords don't match"))]
    pub confirm_password: String,
    pub role: Role,
    #[validate(custom(function = validate_terms_accepted))]
    pub terms_accepted: bool,
}

/// User information returned by auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: i64,
}

/// Login / registration response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

// =============================================================================
// Menu API DTOs
// =============================================================================

/// Create/edit payload for a menu item
///
/// PUT 提交整个表单（与编辑页一致），所以 create 和 update 共用同一个类型。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPayload {
    #[validate(length(min = 1, message = "Please enter a title for the menu item"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please enter a description for the menu item"))]
    pub description: String,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub meal_type: MealType,
    #[validate(length(min = 1, message = "Please enter a serving time"))]
    pub serving_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub nutritional_info: Option<NutritionalInfo>,
}

impl MenuItemPayload {
    /// Drop empty tag/ingredient entries and trim whitespace
    ///
    /// The edit form keeps blank rows around while the user types; they must
    /// never be persisted.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.serving_time = self.serving_time.trim().to_string();
        self.tags = normalize_entries(self.tags);
        self.ingredients = normalize_entries(self.ingredients);
        self.detailed_description = self
            .detailed_description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }
}

fn normalize_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Menu item as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub meal_type: MealType,
    #[serde(default)]
    pub tags: Vec<String>,
    pub serving_time: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub nutritional_info: Option<NutritionalInfo>,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// Feedback API DTOs
// =============================================================================

/// Feedback submission (insert-or-update for the calling user)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmit {
    pub menu_item_id: String,
    /// 0 表示未选择星级，必须在触网前拒绝
    #[validate(range(min = 1, max = 5, message = "Please select a rating before submitting"))]
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Feedback row as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub id: String,
    pub menu_item_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// Validation functions
// =============================================================================

/// Password policy: at least one uppercase, one lowercase, and one digit
fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_policy");
        err.message = Some(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .into(),
        );
        Err(err)
    }
}

fn validate_terms_accepted(accepted: &bool) -> Result<(), ValidationError> {
    if *accepted {
        Ok(())
    } else {
        let mut err = ValidationError::new("terms_accepted");
        err.message = Some("You must accept the terms and conditions".into());
        Err(err)
    }
}

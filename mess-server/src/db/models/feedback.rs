//! Feedback Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::client::FeedbackView;
use surrealdb::RecordId;

/// Feedback ID type
pub type FeedbackId = RecordId;

/// Feedback row matching the `feedback` table
///
/// 不变量：每个 (menu_item, user) 组合至多一行，由仓储层的
/// upsert-by-lookup 保证，而不是数据库约束。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FeedbackId>,
    /// Record link to menu_item
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    /// Record link to profile
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// 1..=5
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Feedback {
    /// API 表示
    pub fn to_view(&self) -> FeedbackView {
        FeedbackView {
            id: self.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            menu_item_id: self.menu_item.to_string(),
            user_id: self.user.to_string(),
            rating: self.rating,
            comment: self.comment.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

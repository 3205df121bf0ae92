//! MenuItem Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::client::MenuItemView;
use shared::{MealType, NutritionalInfo};
use surrealdb::RecordId;

/// MenuItem ID type
pub type MenuItemId = RecordId;

/// Menu item model matching the `menu_item` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuItemId>,
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
    /// 反馈评分的去范式化聚合值
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub nutritional_info: Option<NutritionalInfo>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuItem {
    /// 记录 ID 的字符串形式 ("menu_item:...")
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// API 表示
    pub fn to_view(&self) -> MenuItemView {
        MenuItemView {
            id: self.id_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            detailed_description: self.detailed_description.clone(),
            image_url: self.image_url.clone(),
            meal_type: self.meal_type,
            tags: self.tags.clone(),
            serving_time: self.serving_time.clone(),
            ingredients: self.ingredients.clone(),
            rating: self.rating,
            nutritional_info: self.nutritional_info,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

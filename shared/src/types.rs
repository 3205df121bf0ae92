//! 基础领域类型
//!
//! 菜单和账户共用的枚举与小型值类型。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Meal type of a menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Snacks => "snacks",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "snacks" => Ok(MealType::Snacks),
            "dinner" => Ok(MealType::Dinner),
            other => Err(format!("unknown meal type: {}", other)),
        }
    }
}

/// Account role
///
/// `staff` 可以管理菜单，`regular` 只能浏览和提交反馈。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Regular,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Regular => "regular",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(Role::Staff),
            "regular" => Ok(Role::Regular),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Per-serving nutritional information for a dish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: u32,
    /// Grams per serving
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

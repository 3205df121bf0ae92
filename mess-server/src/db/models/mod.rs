//! Database models
//!
//! 每个实体一个文件；API 侧的 DTO 在 `shared` crate，
//! 模型通过 `to_view` / `to_user_info` 转换后才离开数据层。

pub mod feedback;
pub mod menu_item;
pub mod profile;
pub mod serde_helpers;

pub use feedback::{Feedback, FeedbackId};
pub use menu_item::{MenuItem, MenuItemId};
pub use profile::{Profile, ProfileCreate, ProfileId};

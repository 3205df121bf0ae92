//! 服务层 - 领域服务
//!
//! # 服务列表
//!
//! - [`MenuService`] - 菜单列表缓存、筛选排序、反馈评分聚合
//! - [`ImageStoreService`] - 菜品图片存储（JPEG 转码 + 哈希去重）

pub mod image_store;
pub mod menu;

pub use image_store::{ImageStoreService, StoredImage, IMAGE_URL_PREFIX};
pub use menu::{apply_filter, sort_items, with_retry, MenuCache, MenuFilter, MenuService, MenuSort};

//! Menu Item API Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use shared::client::{MenuItemPayload, MenuItemView};
use shared::{ApiResponse, MealType};

use crate::core::ServerState;
use crate::services::{MenuFilter, MenuSort};
use crate::utils::{AppError, AppResult};

/// Query parameters for GET /api/menu
///
/// `tags` 为逗号分隔列表，命中项必须带齐所有标签。
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub meal_type: Option<String>,
    pub search: Option<String>,
    pub tags: Option<String>,
    pub sort: Option<String>,
}

impl MenuQuery {
    fn into_filter_and_sort(self) -> Result<(MenuFilter, MenuSort), AppError> {
        let meal_type = match self.meal_type.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<MealType>().map_err(|_| {
                AppError::invalid(format!("Unknown meal type: {raw}"))
            })?),
        };

        let tags = self
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let sort = match self.sort.as_deref() {
            None | Some("") => MenuSort::default(),
            Some(raw) => raw.parse()?,
        };

        let filter = MenuFilter {
            meal_type,
            search: self.search.filter(|s| !s.trim().is_empty()),
            tags,
        };

        Ok((filter, sort))
    }
}

/// GET /api/menu - 菜单列表（公开，支持筛选和排序）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItemView>>>> {
    let (filter, sort) = query.into_filter_and_sort()?;
    let items = state.menu.list(&filter, sort).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/menu/:id - 单个菜单项（公开）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItemView>>> {
    let item = state.menu.get(&id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/menu - 新建菜单项（仅 staff）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemPayload>,
) -> AppResult<Json<ApiResponse<MenuItemView>>> {
    payload.validate()?;
    let item = state.menu.create(payload).await?;

    tracing::info!(item_id = %item.id, title = %item.title, "Menu item created");
    Ok(Json(ApiResponse::ok(item)))
}

/// PUT /api/menu/:id - 更新菜单项（仅 staff，整表单提交）
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemPayload>,
) -> AppResult<Json<ApiResponse<MenuItemView>>> {
    payload.validate()?;
    let item = state.menu.update(&id, payload).await?;

    tracing::info!(item_id = %item.id, title = %item.title, "Menu item updated");
    Ok(Json(ApiResponse::ok(item)))
}

/// DELETE /api/menu/:id - 删除菜单项（仅 staff）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItemView>>> {
    let item = state.menu.delete(&id, &state.image_store).await?;

    tracing::info!(item_id = %item.id, title = %item.title, "Menu item deleted");
    Ok(Json(ApiResponse::ok(item)))
}

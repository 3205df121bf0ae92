//! Image Upload Handler
//!
//! Handles dish image uploads from staff users.
//! Supports PNG, JPEG and WebP input; everything is stored as JPEG.

use axum::extract::{Multipart, State};
use axum::Json;

use shared::ApiResponse;

use crate::core::ServerState;
use crate::services::StoredImage;
use crate::utils::{AppError, AppResult};

/// POST /api/upload/image - 上传菜品图片（仅 staff）
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<StoredImage>>> {
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = field.file_name().map(|s| s.to_string());
            field_data = Some(field.bytes().await?.to_vec());
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'")
    })?;

    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    let stored = state.image_store.store(data, &filename).await?;
    Ok(Json(ApiResponse::ok(stored)))
}

//! Feedback API Handlers

use axum::extract::{Extension, Path, State};
use axum::Json;
use validator::Validate;

use shared::client::{FeedbackSubmit, FeedbackView};
use shared::ApiResponse;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/feedback - 提交或更新评分
///
/// 校验先行：rating 为 0（未选星级）在任何数据库查询之前就被拒绝。
/// 同一用户对同一菜品重复提交会覆盖旧评分，不产生新行。
pub async fn submit(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<FeedbackSubmit>,
) -> AppResult<Json<ApiResponse<FeedbackView>>> {
    req.validate()?;

    let feedback = state
        .menu
        .submit_feedback(&req.menu_item_id, &current_user.id, req.rating, req.comment)
        .await?;

    tracing::info!(
        user_id = %current_user.id,
        item_id = %feedback.menu_item_id,
        rating = feedback.rating,
        "Feedback recorded"
    );

    Ok(Json(ApiResponse::ok(feedback)))
}

/// GET /api/feedback/mine/:item_id - 当前用户对某菜品的评分
///
/// 反馈页用它回填已有的星级；没有评分时 data 为 null。
pub async fn mine(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(item_id): Path<String>,
) -> AppResult<Json<ApiResponse<Option<FeedbackView>>>> {
    let feedback = state
        .menu
        .feedback_for(&item_id, &current_user.id)
        .await?;

    Ok(Json(ApiResponse::ok(feedback)))
}

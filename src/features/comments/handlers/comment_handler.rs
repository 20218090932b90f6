use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::comments::dtos::{CommentResponseDto, DeletedCommentsDto};
use crate::features::comments::services::CommentService;
use crate::shared::types::{ApiResponse, Meta};

/// Comments an authority left on reports of one category
#[utoipa::path(
    get,
    path = "/api/comments/report/category_comment/{id}/{category}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Comment author"),
        ("category" = String, Path, description = "Category display name, e.g. \"Road Hazards\"")
    ),
    responses(
        (status = 200, description = "Matching comments", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 400, description = "Unknown category")
    )
)]
pub async fn list_category_comments(
    State(service): State<Arc<CommentService>>,
    Path((user_id, category)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    let comments = service
        .list_by_user_and_category(user_id, &category)
        .await?;
    let total = comments.len();
    Ok(Json(ApiResponse::success(
        Some(comments),
        None,
        Some(Meta::total(total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/comments/report/{report_id}",
    tag = "comments",
    params(("report_id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "The report's comment", body = ApiResponse<CommentResponseDto>),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn get_report_comment(
    State(service): State<Arc<CommentService>>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CommentResponseDto>>> {
    let comment = service.get_by_report(report_id).await?;
    Ok(Json(ApiResponse::success(Some(comment), None, None)))
}

/// Delete a report's comments along with the report
#[utoipa::path(
    delete,
    path = "/api/comments/report/category_comment/{id}",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Comments and report deleted", body = ApiResponse<DeletedCommentsDto>),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_report_comments(
    State(service): State<Arc<CommentService>>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedCommentsDto>>> {
    let deleted = service.delete_by_report(report_id).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Comment and report deleted successfully".to_string()),
        None,
    )))
}

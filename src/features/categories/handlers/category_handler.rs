use axum::Json;

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryTreeDto;
use crate::shared::types::{ApiResponse, Meta};

/// List the fixed category tree
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories with their subcategories", body = ApiResponse<Vec<CategoryTreeDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories() -> Result<Json<ApiResponse<Vec<CategoryTreeDto>>>> {
    let tree = CategoryTreeDto::build_tree();
    let meta = Meta::total(tree.len());
    Ok(Json(ApiResponse::success(Some(tree), None, Some(meta))))
}

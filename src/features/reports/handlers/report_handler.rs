use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::media::dtos::SignedUrlDto;
use crate::features::reports::dtos::{
    CreateReportDto, CreateReportForm, DeletedReportDto, ReportResponseDto, UpdateReportDto,
    UpdateReportForm, UpdateStatusDto, UpdateStatusForm,
};
use crate::features::reports::services::{ReportService, UpdateOutcome};
use crate::shared::multipart::FormData;
use crate::shared::types::{ApiResponse, Meta};

const IMAGE_FIELD: &str = "image";

/// Submit a new report
///
/// Accepts multipart/form-data with an optional `image` part.
#[utoipa::path(
    post,
    path = "/api/reports/report",
    tag = "reports",
    request_body(content = CreateReportForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Missing field, bad category pair or invalid image"),
        (status = 404, description = "User not found"),
        (status = 413, description = "Image too large")
    )
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let mut form = FormData::read(multipart, IMAGE_FIELD).await?;
    let dto = CreateReportDto::from_form(&form)?;

    let report = service.create(dto, form.take_image()).await?;

    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Report created successfully".to_string()),
        None,
    )))
}

/// List every report
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "reports",
    responses(
        (status = 200, description = "All reports, newest first", body = ApiResponse<Vec<ReportResponseDto>>)
    )
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_all().await?;
    let total = reports.len();
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta::total(total)),
    )))
}

/// List reports submitted by a user
#[utoipa::path(
    get,
    path = "/api/reports/report/user/{user_id}",
    tag = "reports",
    params(("user_id" = Uuid, Path, description = "Report owner")),
    responses(
        (status = 200, description = "The user's reports", body = ApiResponse<Vec<ReportResponseDto>>)
    )
)]
pub async fn list_user_reports(
    State(service): State<Arc<ReportService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_by_user(user_id).await?;
    let total = reports.len();
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta::total(total)),
    )))
}

/// List reports in the category an authority handles
#[utoipa::path(
    get,
    path = "/api/reports/report/category/{user_id}",
    tag = "reports",
    params(("user_id" = Uuid, Path, description = "Authority user")),
    responses(
        (status = 200, description = "Reports in the authority's category", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 403, description = "User is not an authority"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_category_reports(
    State(service): State<Arc<ReportService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_for_authority(user_id).await?;
    let total = reports.len();
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta::total(total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/report/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    )
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Fresh signed URL for the report image
#[utoipa::path(
    get,
    path = "/api/reports/report/{id}/image-url",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Signed URL", body = ApiResponse<SignedUrlDto>),
        (status = 404, description = "Report or image not found")
    )
)]
pub async fn get_report_image_url(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SignedUrlDto>>> {
    let url = service.image_url(id).await?;
    Ok(Json(ApiResponse::success(Some(url), None, None)))
}

/// Edit report content
///
/// Only the fields present in the form are compared and written.
#[utoipa::path(
    put,
    path = "/api/reports/report/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body(content = UpdateReportForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Report updated, or nothing has changed", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid field or category pair"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn update_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let mut form = FormData::read(multipart, IMAGE_FIELD).await?;
    let dto = UpdateReportDto::from_form(&form)?;

    let (report, message) = match service.update_content(id, dto, form.take_image()).await? {
        UpdateOutcome::Updated(report) => (report, "Report updated successfully"),
        UpdateOutcome::Unchanged(report) => (report, "Nothing has changed"),
    };

    Ok(Json(ApiResponse::success(
        Some(report),
        Some(message.to_string()),
        None,
    )))
}

/// Move a report through its status workflow (authority only)
///
/// Records the acting authority's comment on the report.
#[utoipa::path(
    put,
    path = "/api/reports/report/status/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body(content = UpdateStatusForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid status value or backward transition"),
        (status = 401, description = "Token missing"),
        (status = 403, description = "Invalid token or caller is not an authority"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_report_status(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let mut form = FormData::read(multipart, IMAGE_FIELD).await?;
    let dto = UpdateStatusDto::from_form(&form)?;

    let report = service
        .update_status(id, dto, form.take_image(), user.user_id)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Report status updated successfully".to_string()),
        None,
    )))
}

/// Delete a report together with its comments
#[utoipa::path(
    delete,
    path = "/api/reports/report/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted", body = ApiResponse<DeletedReportDto>),
        (status = 404, description = "Report not found")
    )
)]
pub async fn delete_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedReportDto>>> {
    let deleted = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Report deleted successfully".to_string()),
        None,
    )))
}

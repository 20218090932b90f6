use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::{Category, Subcategory};
use crate::features::reports::models::{Report, ReportPriority, ReportStatus};
use crate::shared::multipart::FormData;

fn required<'a>(form: &'a FormData, name: &str) -> Result<&'a str> {
    form.text(name)
        .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
}

fn required_parsed<T: std::str::FromStr>(form: &FormData, name: &str) -> Result<T> {
    form.parse::<T>(name)?
        .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
}

/// Multipart form for report creation (documentation only)
///
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateReportForm {
    pub user_id: Uuid,
    #[schema(example = "Road Hazards")]
    pub category: String,
    #[schema(example = "Potholes")]
    pub subcategory: String,
    pub description: String,
    pub location_lat: f64,
    pub location_long: f64,
    /// "low", "medium" (default) or "high"
    pub priority: Option<String>,
    /// Optional photo (jpeg, png, gif or webp, up to 10 MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Multipart form for report content updates (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UpdateReportForm {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub location_lat: Option<f64>,
    pub location_long: Option<f64>,
    pub priority: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Multipart form for status updates (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UpdateStatusForm {
    /// "pending", "in_progress" or "resolved"
    pub status: String,
    /// Defaults to "Status updated to <status>"
    pub comment_text: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Validated input for report creation; category membership is checked by the service
#[derive(Debug, Clone)]
pub struct CreateReportDto {
    pub user_id: Uuid,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub location_lat: f64,
    pub location_long: f64,
    pub priority: Option<ReportPriority>,
}

impl CreateReportDto {
    pub fn from_form(form: &FormData) -> Result<Self> {
        Ok(Self {
            user_id: required_parsed(form, "user_id")?,
            category: required(form, "category")?.to_string(),
            subcategory: required(form, "subcategory")?.to_string(),
            description: required(form, "description")?.to_string(),
            location_lat: required_parsed(form, "location_lat")?,
            location_long: required_parsed(form, "location_long")?,
            priority: form.parse("priority")?,
        })
    }
}

/// Fields a content update may change; absent fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateReportDto {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub location_lat: Option<f64>,
    pub location_long: Option<f64>,
    pub priority: Option<ReportPriority>,
}

impl UpdateReportDto {
    pub fn from_form(form: &FormData) -> Result<Self> {
        Ok(Self {
            category: form.text("category").map(str::to_string),
            subcategory: form.text("subcategory").map(str::to_string),
            description: form.text("description").map(str::to_string),
            location_lat: form.parse("location_lat")?,
            location_long: form.parse("location_long")?,
            priority: form.parse("priority")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UpdateStatusDto {
    pub status: ReportStatus,
    pub comment_text: Option<String>,
}

impl UpdateStatusDto {
    pub fn from_form(form: &FormData) -> Result<Self> {
        let status = form
            .text("status")
            .and_then(|s| s.parse::<ReportStatus>().ok())
            .ok_or_else(|| AppError::Validation("Invalid status value".to_string()))?;

        Ok(Self {
            status,
            comment_text: form.text("comment_text").map(str::to_string),
        })
    }
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub subcategory: Subcategory,
    pub description: String,
    /// Freshly signed, time-limited URL; null when there is no image or signing failed
    pub image_url: Option<String>,
    pub location_lat: f64,
    pub location_long: f64,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub citizen_name: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportResponseDto {
    pub fn new(r: Report, image_url: Option<String>, contact: (String, String)) -> Self {
        let (citizen_name, phone_number) = contact;
        Self {
            id: r.id,
            user_id: r.user_id,
            category: r.category,
            subcategory: r.subcategory,
            description: r.description,
            image_url,
            location_lat: r.location_lat,
            location_long: r.location_long,
            status: r.status,
            priority: r.priority,
            citizen_name,
            phone_number,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Response DTO for a deleted report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedReportDto {
    pub report_id: Uuid,
    pub category: Category,
    pub citizen_name: String,
    pub phone_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_fields() {
        let user_id = Uuid::new_v4().to_string();
        let form = FormData::from_fields(
            &[
                ("user_id", user_id.as_str()),
                ("category", "Road Hazards"),
                ("subcategory", "Potholes"),
                ("location_lat", "32.08"),
                ("location_long", "34.78"),
            ],
            None,
        );

        let err = CreateReportDto::from_form(&form).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "description is required"));
    }

    #[test]
    fn test_create_parses_priority() {
        let user_id = Uuid::new_v4().to_string();
        let form = FormData::from_fields(
            &[
                ("user_id", user_id.as_str()),
                ("category", "Road Hazards"),
                ("subcategory", "Potholes"),
                ("description", "Deep hole on Herzl St"),
                ("location_lat", "32.08"),
                ("location_long", "34.78"),
                ("priority", "high"),
            ],
            None,
        );

        let dto = CreateReportDto::from_form(&form).unwrap();
        assert_eq!(dto.priority, Some(ReportPriority::High));
        assert_eq!(dto.location_long, 34.78);
    }

    #[test]
    fn test_status_value_checked() {
        let form = FormData::from_fields(&[("status", "closed")], None);
        let err = UpdateStatusDto::from_form(&form).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid status value"));

        let form = FormData::from_fields(&[("status", "resolved")], None);
        let dto = UpdateStatusDto::from_form(&form).unwrap();
        assert_eq!(dto.status, ReportStatus::Resolved);
        assert_eq!(dto.comment_text, None);
    }
}

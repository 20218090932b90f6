use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::Category;
use crate::features::comments::models::Comment;
use crate::features::reports::dtos::DeletedReportDto;
use crate::features::reports::models::ReportStatus;

/// Response DTO for comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub report_id: Uuid,
    pub user_id: Uuid,
    pub comment_text: String,
    pub status: ReportStatus,
    pub category: Category,
    pub citizen_name: String,
    pub phone_number: String,
    /// Freshly signed URL; null when there is no image or signing failed
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CommentResponseDto {
    pub fn new(c: Comment, image_url: Option<String>) -> Self {
        Self {
            id: c.id,
            report_id: c.report_id,
            user_id: c.user_id,
            comment_text: c.comment_text,
            status: c.status,
            category: c.category,
            citizen_name: c.citizen_name,
            phone_number: c.phone_number,
            image_url,
            timestamp: c.timestamp,
        }
    }
}

/// What a comment deletion removed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedCommentsDto {
    pub report_id: Uuid,
    pub comments_removed: usize,
    /// Present when the report still existed and was removed too
    pub report: Option<DeletedReportDto>,
}

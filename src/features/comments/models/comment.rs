use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::categories::Category;
use crate::features::reports::models::ReportStatus;

/// Database model for comment
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub report_id: Uuid,
    /// Authority who changed the status
    pub user_id: Uuid,
    pub comment_text: String,
    pub status: ReportStatus,
    pub category: Category,
    /// Copied from the report owner at write time
    pub citizen_name: String,
    pub phone_number: String,
    pub image_key: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Data written on every status change, keyed by (report_id, user_id)
#[derive(Debug, Clone)]
pub struct UpsertComment {
    pub report_id: Uuid,
    pub user_id: Uuid,
    pub comment_text: String,
    pub status: ReportStatus,
    pub category: Category,
    pub citizen_name: String,
    pub phone_number: String,
    pub image_key: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::{Category, Subcategory};
use crate::features::reports::models::{Report, ReportPriority, ReportStatus};
use crate::features::users::User;

pub const UNKNOWN_CITIZEN_NAME: &str = "Unknown";
pub const UNKNOWN_PHONE_NUMBER: &str = "N/A";

/// Report snapshot pushed with `reportAdded` and `reportUpdated`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportEvent {
    pub report_id: Uuid,
    pub citizen_id: Uuid,
    pub category: Category,
    pub subcategory: Subcategory,
    pub description: String,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub location_lat: f64,
    pub location_long: f64,
    /// Short-lived signed URL, absent when the report has no image
    pub image_url: Option<String>,
    pub citizen_name: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportEvent {
    pub fn new(report: &Report, owner: Option<&User>, image_url: Option<String>) -> Self {
        let (citizen_name, phone_number) = citizen_contact(owner);
        Self {
            report_id: report.id,
            citizen_id: report.user_id,
            category: report.category,
            subcategory: report.subcategory,
            description: report.description.clone(),
            status: report.status,
            priority: report.priority,
            location_lat: report.location_lat,
            location_long: report.location_long,
            image_url,
            citizen_name,
            phone_number,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// Payload of `reportDeleted`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeletedReportEvent {
    pub report_id: Uuid,
    pub category: Category,
    pub citizen_name: String,
    pub phone_number: String,
}

/// Payload of `receiveMessage`; `from` is the sender's connection id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DirectMessage {
    pub message: String,
    pub from: Uuid,
}

/// Payload of a client `sendMessage` frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub recipient_id: Uuid,
    pub message: String,
}

/// Frames written to the socket: `{"event": "...", "data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    ReportAdded(ReportEvent),
    ReportUpdated(ReportEvent),
    ReportDeleted(DeletedReportEvent),
    ReceiveMessage(DirectMessage),
}

/// Frames read from the socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    RegisterUser(Uuid),
    SendMessage(OutgoingMessage),
}

/// Display name and phone of a report owner with placeholder fallbacks
pub fn citizen_contact(owner: Option<&User>) -> (String, String) {
    let name = owner
        .map(|u| u.username.clone())
        .unwrap_or_else(|| UNKNOWN_CITIZEN_NAME.to_string());
    let phone = owner
        .and_then(|u| u.phone_number.clone())
        .unwrap_or_else(|| UNKNOWN_PHONE_NUMBER.to_string());
    (name, phone)
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// Allowed MIME types for report and comment images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum image size in bytes (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// An image received in a multipart form, not yet stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

impl ImageUpload {
    /// Reject oversized files and anything that is not an allowed image type
    pub fn validate(&self) -> Result<()> {
        if self.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::PayloadTooLarge(format!(
                "Image too large. Maximum size is {} MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            )));
        }

        if !is_image_type_allowed(&self.content_type) {
            return Err(AppError::Validation(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                self.content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }

        Ok(())
    }
}

/// Response DTO for a freshly minted signed image URL
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignedUrlDto {
    /// Time-limited URL to the stored image
    pub signed_url: String,
    /// Seconds until the URL stops working
    pub expires_in: u32,
}

pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

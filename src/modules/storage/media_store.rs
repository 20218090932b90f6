use async_trait::async_trait;

use crate::core::error::AppError;

/// Private object storage addressed by opaque keys
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Mint a time-limited GET URL for `key`
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::config::MediaConfig;
use crate::core::error::Result;
use crate::features::media::dtos::ImageUpload;
use crate::modules::storage::MediaStore;

/// How long a minted URL should stay valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlExpiry {
    /// Short-lived URLs for list views
    List,
    /// Long-lived URLs for single-report fetches
    Detail,
}

/// Stores images and resolves stored keys into signed URLs
pub struct MediaService {
    store: Arc<dyn MediaStore>,
    config: MediaConfig,
}

impl MediaService {
    pub fn new(store: Arc<dyn MediaStore>, config: MediaConfig) -> Self {
        Self { store, config }
    }

    pub fn expiry_secs(&self, expiry: UrlExpiry) -> u32 {
        match expiry {
            UrlExpiry::List => self.config.list_url_expiry_secs,
            UrlExpiry::Detail => self.config.detail_url_expiry_secs,
        }
    }

    /// Upload an image under a fresh random key and return the key
    pub async fn store_image(&self, image: ImageUpload) -> Result<String> {
        image.validate()?;

        let key = generate_key();
        self.store
            .upload(&key, image.data, &image.content_type)
            .await?;

        debug!("Stored image '{}' as '{}'", image.file_name, key);
        Ok(key)
    }

    /// Mint a signed URL, failing if the store refuses
    pub async fn signed_url(&self, key: &str, expiry: UrlExpiry) -> Result<String> {
        self.store.presign_get(key, self.expiry_secs(expiry)).await
    }

    /// Mint a signed URL for display; a signing failure is logged and yields `None`
    pub async fn resolve(&self, key: Option<&str>, expiry: UrlExpiry) -> Option<String> {
        let key = key?;
        match self.signed_url(key, expiry).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Failed to sign URL for image '{}': {:?}", key, e);
                None
            }
        }
    }

    /// Best-effort delete; errors are logged and swallowed
    pub async fn discard(&self, key: Option<&str>) {
        let Some(key) = key else {
            return;
        };

        if let Err(e) = self.store.delete(key).await {
            warn!("Failed to delete image '{}': {:?}", key, e);
        }
    }
}

/// 32 lowercase hex characters
fn generate_key() -> String {
    hex::encode(Uuid::new_v4().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::InMemoryMediaStore;

    fn png() -> ImageUpload {
        ImageUpload {
            data: vec![0x89, 0x50, 0x4e, 0x47],
            content_type: "image/png".to_string(),
            file_name: "pothole.png".to_string(),
        }
    }

    #[test]
    fn test_generated_key_shape() {
        let key = generate_key();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, generate_key());
    }

    #[tokio::test]
    async fn test_store_then_resolve_uses_expiry_per_view() {
        let store = Arc::new(InMemoryMediaStore::default());
        let service = MediaService::new(store.clone(), MediaConfig::default());

        let key = service.store_image(png()).await.unwrap();
        assert!(store.contains(&key));

        let list = service.resolve(Some(&key), UrlExpiry::List).await.unwrap();
        assert!(list.contains(&key));
        assert!(list.ends_with("expires=60"));

        let detail = service.resolve(Some(&key), UrlExpiry::Detail).await.unwrap();
        assert!(detail.ends_with("expires=604800"));
    }

    #[tokio::test]
    async fn test_resolve_swallows_signing_failure() {
        let store = Arc::new(InMemoryMediaStore::failing());
        let service = MediaService::new(store, MediaConfig::default());

        assert_eq!(service.resolve(Some("abc"), UrlExpiry::List).await, None);
        assert_eq!(service.resolve(None, UrlExpiry::List).await, None);
    }

    #[tokio::test]
    async fn test_discard_swallows_delete_failure() {
        let store = Arc::new(InMemoryMediaStore::failing());
        let service = MediaService::new(store, MediaConfig::default());

        service.discard(Some("missing")).await;
    }
}

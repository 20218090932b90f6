//! Object storage for report and comment images
//!
//! The `MediaStore` trait is the seam services depend on; `MinIOClient`
//! is the MinIO/S3-compatible implementation.

mod media_store;
mod minio_client;

pub use media_store::MediaStore;
pub use minio_client::MinIOClient;

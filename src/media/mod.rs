pub mod cloudinary;
pub mod memory;

pub use cloudinary::CloudinaryStorage;
pub use memory::{InMemoryMediaStorage, RecordedUpload};

use async_trait::async_trait;
use axum::body::Bytes;

use crate::error::AppResult;
use crate::models::MediaAsset;

/// Folders used on the media host
pub mod folders {
    pub const AVATARS: &str = "avatars";
    pub const RESUMES: &str = "resumes";
    pub const PROJECT_IMAGES: &str = "project-images";
    pub const EXPERIENCE_IMAGES: &str = "experience-images";
    pub const COMPANY_LOGOS: &str = "company-logos";
}

/// MIME types accepted for uploads
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// A file received in a multipart request, held in memory until uploaded
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Form field the file arrived under
    pub field: String,
    /// Client-supplied filename
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Remote object storage for uploaded files
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store the file under `folder`, returning its public URL and storage id
    async fn upload(&self, file: &UploadFile, folder: &str) -> AppResult<MediaAsset>;

    /// Remove a stored file by its storage id
    async fn delete(&self, public_id: &str) -> AppResult<()>;
}

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::media::{MediaStorage, UploadFile};
use crate::models::MediaAsset;

/// An upload accepted by [`InMemoryMediaStorage`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub folder: String,
    pub file_name: String,
    pub public_id: String,
}

/// Media storage that keeps a log of calls instead of talking to a host
#[derive(Default)]
pub struct InMemoryMediaStorage {
    counter: AtomicUsize,
    fail_uploads: AtomicBool,
    uploads: Mutex<Vec<RecordedUpload>>,
    deleted: Mutex<Vec<String>>,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following upload fail with an upstream error
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().await.clone()
    }

    pub async fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn upload(&self, file: &UploadFile, folder: &str) -> AppResult<MediaAsset> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("Media upload failed: host unavailable".into()));
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let public_id = format!("{}/{}", folder, n);

        self.uploads.lock().await.push(RecordedUpload {
            folder: folder.to_string(),
            file_name: file.file_name.clone(),
            public_id: public_id.clone(),
        });

        Ok(MediaAsset {
            url: format!("https://media.test/{}/{}-{}", folder, n, file.file_name),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.deleted.lock().await.push(public_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn file(name: &str) -> UploadFile {
        UploadFile {
            field: "images".into(),
            file_name: name.into(),
            content_type: "image/png".into(),
            bytes: Bytes::from_static(b"png"),
        }
    }

    #[tokio::test]
    async fn records_uploads_and_deletes() {
        let storage = InMemoryMediaStorage::new();

        let asset = storage.upload(&file("a.png"), "avatars").await.unwrap();
        assert_eq!(asset.public_id, "avatars/1");
        assert_eq!(asset.url, "https://media.test/avatars/1-a.png");

        storage.delete(&asset.public_id).await.unwrap();
        assert_eq!(storage.uploads().await.len(), 1);
        assert_eq!(storage.deleted_ids().await, vec!["avatars/1".to_string()]);
    }

    #[tokio::test]
    async fn can_simulate_host_failure() {
        let storage = InMemoryMediaStorage::new();
        storage.fail_uploads(true);

        let err = storage.upload(&file("a.png"), "avatars").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(storage.uploads().await.is_empty());
    }
}

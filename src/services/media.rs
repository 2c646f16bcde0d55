use crate::error::AppResult;
use crate::media::{MediaStorage, UploadFile};
use crate::models::MediaAsset;

/// Uploads and deletes of remote blobs on behalf of handlers
///
/// Files are processed one at a time. A failure part way through leaves the
/// earlier blobs in place; their ids are logged.
pub struct MediaService;

impl MediaService {
    /// Upload every file to `folder`, in order
    pub async fn upload_all(
        storage: &dyn MediaStorage,
        files: &[UploadFile],
        folder: &str,
    ) -> AppResult<Vec<(MediaAsset, String)>> {
        let mut uploaded: Vec<(MediaAsset, String)> = Vec::with_capacity(files.len());

        for file in files {
            match storage.upload(file, folder).await {
                Ok(asset) => uploaded.push((asset, file.file_name.clone())),
                Err(err) => {
                    if !uploaded.is_empty() {
                        let orphaned: Vec<&str> =
                            uploaded.iter().map(|(a, _)| a.public_id.as_str()).collect();
                        tracing::warn!("Upload to {} failed, orphaned blobs: {:?}", folder, orphaned);
                    }
                    return Err(err);
                }
            }
        }

        Ok(uploaded)
    }

    /// Upload a single file to `folder`
    pub async fn upload_one(
        storage: &dyn MediaStorage,
        file: &UploadFile,
        folder: &str,
    ) -> AppResult<MediaAsset> {
        storage.upload(file, folder).await
    }

    /// Delete every blob id, stopping at the first failure
    pub async fn delete_all<I, S>(storage: &dyn MediaStorage, ids: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            if id.is_empty() {
                continue;
            }
            storage.delete(id).await.inspect_err(|e| {
                tracing::error!("Failed to delete blob {}: {}", id, e);
            })?;
            tracing::info!("Deleted blob {}", id);
        }
        Ok(())
    }
}

//! Local media storage for generated and uploaded images.

use std::path::{Path, PathBuf};

use crate::errors::AppResult;

/// Directory-backed file store.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a file named `file_name` would have in the store.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Write `bytes` under `file_name`, creating the directory on demand.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored media file");
        Ok(path)
    }

    /// Generated image name for a unix timestamp.
    pub fn generated_image_name(timestamp: i64) -> String {
        format!("generated_image_{}.png", timestamp)
    }

    /// Collision-free name for an upload, keeping a sanitized extension.
    pub fn upload_name(original: Option<&str>) -> String {
        let extension = original
            .and_then(|name| Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "png".to_string());
        format!("upload_{}.{}", uuid::Uuid::new_v4().simple(), extension)
    }
}

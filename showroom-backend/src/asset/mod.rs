//! Screenshot asset pipeline
//!
//! Three operations are offered to the record layer:
//!
//! * [`ScreenshotPipeline::generate_path`] picks a fresh storage path for an upload
//! * [`ScreenshotPipeline::process_thumbnail`] shrinks the stored image in place
//! * [`ScreenshotPipeline::delete_asset`] removes the stored file and never fails
//!
//! The record layer calls them through the lifecycle hooks in [`hooks`].

pub mod error;
pub mod hooks;
pub mod storage;
pub mod thumbnail;

use std::sync::Arc;
use std::time::Duration;

use showroom_shared::{AssetPath, SCREENSHOT_NAMESPACE};
use tracing::{debug, instrument, warn};

pub use error::AssetError;
pub use storage::{FsMediaStorage, MediaStorage, StorageError};
pub use thumbnail::{Thumbnail, ThumbnailConfig, ThumbnailProcessor};

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub namespace: String,
    pub thumbnail: ThumbnailConfig,
    /// Upper bound on decode + resize, `None` waits indefinitely.
    pub processing_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            namespace: SCREENSHOT_NAMESPACE.to_string(),
            thumbnail: ThumbnailConfig::default(),
            processing_timeout: None,
        }
    }
}

pub struct ScreenshotPipeline {
    storage: Arc<dyn MediaStorage>,
    processor: Arc<ThumbnailProcessor>,
    namespace: String,
    processing_timeout: Option<Duration>,
}

impl ScreenshotPipeline {
    pub fn new(storage: Arc<dyn MediaStorage>, config: PipelineConfig) -> Self {
        Self {
            storage,
            processor: Arc::new(ThumbnailProcessor::new(config.thumbnail)),
            namespace: config.namespace,
            processing_timeout: config.processing_timeout,
        }
    }

    pub fn storage(&self) -> &Arc<dyn MediaStorage> {
        &self.storage
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Storage path for a new upload, only the extension of `original_filename` is kept.
    pub fn generate_path(&self, original_filename: &str) -> Result<AssetPath, AssetError> {
        Ok(showroom_shared::generate_path(
            original_filename,
            &self.namespace,
        )?)
    }

    /// Persist uploaded bytes at a previously generated path.
    pub async fn store_upload(&self, path: &AssetPath, data: &[u8]) -> Result<(), AssetError> {
        self.storage.write(path, data).await?;
        Ok(())
    }

    /// Replace the image at `path` with a version that fits the configured box.
    ///
    /// On any error the stored bytes are left exactly as they were.
    #[instrument(level = "debug", skip_all, fields(path = %path))]
    pub async fn process_thumbnail(&self, path: &AssetPath) -> Result<Thumbnail, AssetError> {
        let original = self.storage.read(path).await?;
        let processor = self.processor.clone();
        let extension = path.extension().map(str::to_string);

        let task = tokio::task::spawn_blocking(move || {
            processor.render(&original, extension.as_deref())
        });
        let joined = match self.processing_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| AssetError::Timeout(limit))?,
            None => task.await,
        };
        let rendered =
            joined.map_err(|err| AssetError::Decode(format!("thumbnail task failed: {err}")))??;

        if let Some(data) = rendered.data {
            self.storage.write(path, &data).await?;
        }
        debug!(
            width = rendered.thumbnail.width,
            height = rendered.thumbnail.height,
            resized = rendered.thumbnail.resized(),
            "Processed screenshot"
        );
        Ok(rendered.thumbnail)
    }

    /// Remove the stored file at `path`. A missing file counts as success and
    /// any other failure is logged, never returned.
    pub async fn delete_asset(&self, path: &AssetPath) {
        match self.storage.delete(path).await {
            Ok(true) => debug!(path = %path, "Deleted asset"),
            Ok(false) => debug!(path = %path, "Asset already absent"),
            Err(err) => warn!(path = %path, "Failed to delete asset, leaving it behind: {err}"),
        }
    }
}

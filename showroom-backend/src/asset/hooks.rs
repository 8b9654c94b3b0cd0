//! Record lifecycle hooks for screenshot assets
//!
//! The record layer calls [`ScreenshotPipeline::after_save`] once a website row
//! has been written and its upload is in storage, and
//! [`ScreenshotPipeline::before_delete`] before the row goes away.

use showroom_shared::AssetPath;
use tracing::warn;

use super::{AssetError, ScreenshotPipeline, Thumbnail};

impl ScreenshotPipeline {
    /// Runs thumbnail processing for a freshly saved record.
    ///
    /// A failure leaves the record and its unprocessed file in place; it is
    /// logged here and handed back so the caller can report it.
    pub async fn after_save(&self, path: &AssetPath) -> Result<Thumbnail, AssetError> {
        self.process_thumbnail(path)
            .await
            .inspect_err(|err| warn!(path = %path, "Screenshot kept unprocessed: {err}"))
    }

    /// Removes the record's stored file. Never blocks the deletion.
    pub async fn before_delete(&self, path: &AssetPath) {
        self.delete_asset(path).await
    }
}

pub mod asset;
pub mod category;
pub mod cli;
pub mod db;
pub mod edition;
pub mod entity;
pub mod logging;
pub mod migration;
pub mod validation;
pub mod website;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use showroom_shared::ShowroomError;
use tracing::debug;

use crate::asset::{AssetError, FsMediaStorage, ScreenshotPipeline};
use crate::cli::CliOpts;

pub struct AppState {
    pub conn: DatabaseConnection,
    pub pipeline: ScreenshotPipeline,
}

impl AppState {
    pub async fn new(cli: &CliOpts) -> Result<Self, ShowroomError> {
        let conn = db::new(&cli.db_path()).await?;
        let media_root = cli.media_root();
        debug!("Storing media under {}", media_root.display());
        let storage = FsMediaStorage::new(media_root)
            .await
            .map_err(AssetError::from)?;
        Ok(Self {
            conn,
            pipeline: ScreenshotPipeline::new(Arc::new(storage), cli.pipeline_config()),
        })
    }

    #[cfg(test)]
    pub async fn test(media_root: &std::path::Path) -> Self {
        let conn = db::start_db(None)
            .await
            .expect("Failed to start test DB");
        let storage = FsMediaStorage::new(media_root)
            .await
            .expect("Failed to set up test media root");
        Self {
            conn,
            pipeline: ScreenshotPipeline::new(Arc::new(storage), asset::PipelineConfig::default()),
        }
    }
}

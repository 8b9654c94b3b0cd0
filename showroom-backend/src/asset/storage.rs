//! Media storage backends
//!

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use showroom_shared::AssetPath;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Scratch directory under the media root for in-flight writes.
const TEMP_DIR: &str = ".tmp";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("asset not found: {0}")]
    NotFound(AssetPath),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte storage addressed by [`AssetPath`], rooted at one media root.
///
/// Implementations must tolerate concurrent operations on distinct paths.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `data` at `path`, replacing anything already there. Readers never
    /// see a partially written file.
    async fn write(&self, path: &AssetPath, data: &[u8]) -> Result<(), StorageError>;

    async fn read(&self, path: &AssetPath) -> Result<Vec<u8>, StorageError>;

    /// Returns `true` if something was deleted, `false` if nothing was there.
    async fn delete(&self, path: &AssetPath) -> Result<bool, StorageError>;

    async fn exists(&self, path: &AssetPath) -> Result<bool, StorageError>;
}

/// Local filesystem storage, the media root holding `<namespace>/<file>` trees.
#[derive(Debug)]
pub struct FsMediaStorage {
    root: PathBuf,
}

impl FsMediaStorage {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(root.join(TEMP_DIR)).await?;
        debug!("Media storage rooted at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location for an asset path.
    pub fn resolve(&self, path: &AssetPath) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    fn temp_path(&self) -> PathBuf {
        self.root
            .join(TEMP_DIR)
            .join(format!("{}.part", uuid::Uuid::new_v4()))
    }

    async fn write_temp(temp_path: &Path, data: &[u8]) -> Result<(), std::io::Error> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl MediaStorage for FsMediaStorage {
    async fn write(&self, path: &AssetPath, data: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        if let Err(err) = Self::write_temp(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        if let Err(err) = fs::rename(&temp_path, &target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }
        debug!(path = %path, bytes = data.len(), "Wrote asset");
        Ok(())
    }

    async fn read(&self, path: &AssetPath) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.resolve(path)).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, path: &AssetPath) -> Result<bool, StorageError> {
        match fs::remove_file(self.resolve(path)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn exists(&self, path: &AssetPath) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.resolve(path)).await?)
    }
}

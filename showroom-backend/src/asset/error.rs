use std::time::Duration;

use showroom_shared::asset::AssetPathError;
use showroom_shared::{AssetErrorKind, ShowroomError};

use super::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The stored bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    InvalidFilename(#[from] AssetPathError),
    #[error("thumbnail processing did not finish within {0:?}")]
    Timeout(Duration),
}

impl From<AssetError> for ShowroomError {
    fn from(err: AssetError) -> Self {
        let kind = match err {
            AssetError::InvalidFilename(err) => return ShowroomError::AssetPath(err),
            AssetError::Decode(_) => AssetErrorKind::Decode,
            AssetError::UnsupportedFormat(_) => AssetErrorKind::UnsupportedFormat,
            AssetError::Storage(StorageError::NotFound(_)) => AssetErrorKind::NotFound,
            AssetError::Storage(StorageError::Io(_)) => AssetErrorKind::Storage,
            AssetError::Timeout(_) => AssetErrorKind::Timeout,
        };
        ShowroomError::Asset {
            kind,
            message: err.to_string(),
        }
    }
}

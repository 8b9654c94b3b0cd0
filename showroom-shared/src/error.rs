use crate::asset::AssetPathError;

/// Which stage of screenshot handling failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetErrorKind {
    Decode,
    UnsupportedFormat,
    NotFound,
    Storage,
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum ShowroomError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("io error: {0}")]
    IOError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    DatabaseError(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    AssetPath(#[from] AssetPathError),
    #[error("asset error ({kind:?}): {message}")]
    Asset {
        kind: AssetErrorKind,
        message: String,
    },
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for ShowroomError {
    fn from(err: std::io::Error) -> Self {
        ShowroomError::IOError(err.to_string())
    }
}

impl From<sea_orm::DbErr> for ShowroomError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShowroomError::DatabaseError(err.to_string())
    }
}

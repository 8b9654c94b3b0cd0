//! Screenshot asset references and their naming convention
//!
//! Every stored screenshot lives at `<namespace>/s_<uuid><ext>`, where the
//! uuid is a version 1 (time + node) identifier minted per upload and `ext`
//! is copied verbatim from the uploaded filename.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use sea_orm::DeriveValueType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage subdirectory for website screenshots.
pub const SCREENSHOT_NAMESPACE: &str = "screenshots";

/// Marker placed in front of the identifier in every generated filename.
pub const ASSET_FILE_PREFIX: &str = "s_";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetPathError {
    #[error("filename {0:?} has no extension")]
    MissingExtension(String),
    #[error("filename {0:?} has an invalid extension")]
    InvalidExtension(String),
    #[error("invalid asset path {0:?}")]
    InvalidPath(String),
}

/// Relative storage path of a stored asset, as recorded on its owning row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, DeriveValueType)]
#[serde(transparent)]
pub struct AssetPath(String);

impl AssetPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last `/`, empty for a bare filename.
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once('/').map(|(ns, _)| ns).unwrap_or("")
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map(|(_, name)| name).unwrap_or(&self.0)
    }

    /// Extension including the leading dot, case preserved.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        name.rfind('.').map(|pos| &name[pos..])
    }

    /// Path segments, for joining onto a storage root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    fn validate(value: &str) -> Result<(), AssetPathError> {
        let invalid = value.is_empty()
            || value.starts_with('/')
            || value.contains('\\')
            || value.contains('\0')
            || value
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..");
        match invalid {
            true => Err(AssetPathError::InvalidPath(value.to_string())),
            false => Ok(()),
        }
    }
}

impl FromStr for AssetPath {
    type Err = AssetPathError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::validate(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for AssetPath {
    type Error = AssetPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pulls the extension (from the last `.` to the end) out of an uploaded filename.
///
/// Any client-side directory components are ignored. Names without a dot, or
/// ending in a bare dot, are rejected.
pub fn extract_extension(original_filename: &str) -> Result<&str, AssetPathError> {
    let base = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);
    let pos = base
        .rfind('.')
        .ok_or_else(|| AssetPathError::MissingExtension(original_filename.to_string()))?;
    let extension = &base[pos..];
    if extension.len() < 2 {
        return Err(AssetPathError::InvalidExtension(
            original_filename.to_string(),
        ));
    }
    Ok(extension)
}

/// Random node identifier for this process, with the multicast bit set as
/// RFC 4122 requires for nodes that are not IEEE 802 addresses.
fn node_id() -> &'static [u8; 6] {
    static NODE_ID: OnceLock<[u8; 6]> = OnceLock::new();
    NODE_ID.get_or_init(|| {
        let mut node: [u8; 6] = rand::random();
        node[0] |= 0x01;
        node
    })
}

/// Builds a fresh storage path for an upload called `original_filename`.
///
/// Only the extension of the original name survives. No I/O happens here.
pub fn generate_path(original_filename: &str, namespace: &str) -> Result<AssetPath, AssetPathError> {
    let extension = extract_extension(original_filename)?;
    compose_path(namespace, Uuid::now_v1(node_id()), extension)
}

pub fn compose_path(
    namespace: &str,
    identifier: Uuid,
    extension: &str,
) -> Result<AssetPath, AssetPathError> {
    format!("{namespace}/{ASSET_FILE_PREFIX}{identifier}{extension}").try_into()
}

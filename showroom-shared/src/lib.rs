pub mod asset;
pub mod error;
pub mod fields;

pub use asset::{generate_path, AssetPath, SCREENSHOT_NAMESPACE};
pub use error::{AssetErrorKind, ShowroomError};

//! Error kinds surfaced by the gallery.
//!
//! The first three variants are the runtime failures of the AR pipeline. They
//! never propagate past the component that detects them: the `Display` text is
//! what the user sees. `Config` and `Catalog` only occur at startup.

use thiserror::Error;

use crate::catalog::ItemId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArError {
    /// Reachability probe failed (bad status or transport error).
    #[error("3D model not found. Please check the file path.")]
    AssetUnreachable { item: ItemId },

    /// The embedded viewer reported a load error.
    #[error("The 3D model could not be loaded: {0}")]
    ViewerLoadFailed(String),

    #[error("AR is not supported on this device or browser.")]
    ArUnsupported,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),
}

pub type Result<T> = std::result::Result<T, ArError>;

impl From<serde_json::Error> for ArError {
    fn from(e: serde_json::Error) -> Self {
        ArError::Config(e.to_string())
    }
}

//! Error types for the version store

use std::path::PathBuf;

/// Errors persisting the version store
///
/// Load-side corruption is not represented here: an unreadable prior
/// store degrades to "no history" inside [`crate::VersionStore::load`]
/// and never crosses the tracker boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO failure writing the store file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store serialization failure
    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Create an IO error for a path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

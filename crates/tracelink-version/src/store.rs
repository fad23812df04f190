//! Durable version store
//!
//! The store maps each artifact id to its **current** version record.
//! It is loaded fully at tracker start and rewritten fully at tracker
//! end, once per run. Superseded records live on only through the
//! parent pointers of the records that replaced them.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::StoreError;
use crate::schema::ArtifactVersion;

/// Artifact-id → current-version map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionStore {
    versions: BTreeMap<String, ArtifactVersion>,
}

impl VersionStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store file, degrading to empty on any failure
    ///
    /// A missing file means no history yet; an unreadable or corrupt
    /// file is logged and likewise treated as no history, so every
    /// artifact in the following run is recorded as new. Neither case
    /// fails the caller.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::new();
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "version store unreadable, starting with no history");
                return Self::new();
            }
        };
        match serde_json::from_str::<BTreeMap<String, ArtifactVersion>>(&raw) {
            Ok(versions) => {
                tracing::debug!(path = %path.display(), artifacts = versions.len(), "loaded version store");
                Self { versions }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "version store corrupt, starting with no history");
                Self::new()
            }
        }
    }

    /// Write the store to disk, creating parent directories
    ///
    /// # Errors
    /// Returns [`StoreError`] on IO or serialization failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io_error(parent, e))?;
        }
        let raw = serde_json::to_string_pretty(&self.versions)?;
        std::fs::write(path, raw).map_err(|e| StoreError::io_error(path, e))
    }

    /// Current version of an artifact, if any
    #[inline]
    #[must_use]
    pub fn current(&self, artifact_id: &str) -> Option<&ArtifactVersion> {
        self.versions.get(artifact_id)
    }

    /// Record a version as current for its artifact id
    pub fn insert(&mut self, version: ArtifactVersion) {
        self.versions.insert(version.artifact_id.clone(), version);
    }

    /// Number of tracked artifacts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the store tracks nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Iterate current versions in artifact-id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtifactVersion)> {
        self.versions.iter().map(|(id, v)| (id.as_str(), v))
    }
}

//! Version record schema

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::{canonical_json, content_hash};

/// Source tool an artifact was extracted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Cameo/MagicDraw requirements models
    Cameo,
    /// Simulink block-diagram models
    Simulink,
}

impl Tool {
    /// Stable lowercase identifier
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Cameo => "cameo",
            Tool::Simulink => "simulink",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of tracked artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    /// A requirement node
    Requirement,
    /// A diagram block node
    Model,
}

impl ArtifactType {
    /// Stable lowercase identifier
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactType::Requirement => "requirement",
            ArtifactType::Model => "model",
        }
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable version record
///
/// Records are append-only: a change emits a new record whose
/// `parent_version_id` points at the superseded one, forming a
/// singly-linked lineage per artifact id. `version_id` is the SHA-256
/// of the canonical snapshot, so identical content always reproduces
/// the identical id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    /// Business id of the tracked artifact
    pub artifact_id: String,
    /// Content hash of the snapshot
    pub version_id: String,
    /// Artifact kind
    pub artifact_type: ArtifactType,
    /// Extracting tool
    pub tool: Tool,
    /// RFC 3339 UTC creation time
    pub timestamp: String,
    /// Prior current version, `None` for first-seen artifacts
    pub parent_version_id: Option<String>,
    /// Canonical JSON snapshot the hash was computed over
    pub snapshot: Option<String>,
}

impl ArtifactVersion {
    /// Build a version record from a snapshot value
    ///
    /// The snapshot is stored in canonical form so a record can always
    /// be re-verified against its own `version_id`.
    #[must_use]
    pub fn from_snapshot(
        artifact_id: impl Into<String>,
        snapshot: &Value,
        artifact_type: ArtifactType,
        tool: Tool,
        parent_version_id: Option<String>,
    ) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            version_id: content_hash(snapshot),
            artifact_type,
            tool,
            timestamp: chrono::Utc::now().to_rfc3339(),
            parent_version_id,
            snapshot: Some(canonical_json(snapshot)),
        }
    }

    /// Recompute the hash of the stored snapshot and compare
    ///
    /// Returns false for records without a snapshot.
    #[must_use]
    pub fn verify(&self) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        match serde_json::from_str::<Value>(snapshot) {
            Ok(value) => content_hash(&value) == self.version_id,
            Err(_) => false,
        }
    }
}

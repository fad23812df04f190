//! Change tracking over a canonical graph document

use std::path::Path;

use tracelink_graph::GraphDocument;

use crate::canonical::content_hash;
use crate::error::StoreError;
use crate::schema::{ArtifactType, ArtifactVersion, Tool};
use crate::store::VersionStore;

/// Result of one tracking run
#[derive(Debug, Clone, Default)]
pub struct TrackOutcome {
    /// The updated current-version map to persist
    pub store: VersionStore,
    /// Artifacts seen for the first time
    pub new_count: usize,
    /// Artifacts whose content hash moved
    pub changed_count: usize,
    /// Artifacts whose record was carried forward untouched
    pub unchanged_count: usize,
}

impl TrackOutcome {
    /// Number of version records this run emitted
    #[inline]
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.new_count + self.changed_count
    }
}

/// Detect changes between a document and the prior version store
///
/// Per node: no prior version emits a new record with a null parent;
/// a prior version with a different hash emits a record whose parent is
/// the prior version's id, which then becomes current; an identical
/// hash carries the prior record forward unchanged (idempotent no-op).
///
/// Reverting an artifact to earlier content reproduces the earlier
/// hash, but is still recorded as an ordinary change pointing at the
/// version it replaced; records are never re-linked into older lineage.
#[must_use]
pub fn track(
    doc: &GraphDocument,
    artifact_type: ArtifactType,
    tool: Tool,
    previous: &VersionStore,
) -> TrackOutcome {
    let mut outcome = TrackOutcome::default();

    for (artifact_id, node) in &doc.nodes {
        let snapshot = match serde_json::to_value(node) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(artifact = %artifact_id, error = %e, "snapshot serialization failed, skipping");
                continue;
            }
        };
        let current_hash = content_hash(&snapshot);

        match previous.current(artifact_id) {
            Some(prior) if prior.version_id == current_hash => {
                outcome.store.insert(prior.clone());
                outcome.unchanged_count += 1;
            }
            Some(prior) => {
                tracing::info!(tool = %tool, artifact = %artifact_id, "changed");
                outcome.store.insert(ArtifactVersion::from_snapshot(
                    artifact_id,
                    &snapshot,
                    artifact_type,
                    tool,
                    Some(prior.version_id.clone()),
                ));
                outcome.changed_count += 1;
            }
            None => {
                tracing::info!(tool = %tool, artifact = %artifact_id, "new");
                outcome.store.insert(ArtifactVersion::from_snapshot(
                    artifact_id,
                    &snapshot,
                    artifact_type,
                    tool,
                    None,
                ));
                outcome.new_count += 1;
            }
        }
    }

    tracing::info!(
        tool = %tool,
        new = outcome.new_count,
        changed = outcome.changed_count,
        unchanged = outcome.unchanged_count,
        "version tracking complete"
    );
    outcome
}

/// Track against a store file: load, detect, rewrite
///
/// The store is read once before tracking (degrading to no history when
/// unreadable) and rewritten once after.
///
/// # Errors
/// Returns [`StoreError`] only when the rewritten store cannot be
/// persisted; the in-memory outcome is computed either way.
pub fn track_file(
    doc: &GraphDocument,
    artifact_type: ArtifactType,
    tool: Tool,
    store_path: impl AsRef<Path>,
) -> Result<TrackOutcome, StoreError> {
    let previous = VersionStore::load(&store_path);
    let outcome = track(doc, artifact_type, tool, &previous);
    outcome.store.save(&store_path)?;
    Ok(outcome)
}

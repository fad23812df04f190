//! Graph document: the node-map contract and batch merging

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::node::CanonicalNode;

/// A canonical graph document: `{ "nodes": { id: node } }`
///
/// Node order follows insertion so exported documents remain diffable
/// across runs of the same input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Nodes keyed by business id
    pub nodes: IndexMap<String, CanonicalNode>,
}

/// Record of a same-id, different-content overwrite during a merge
///
/// Last-write-wins is acceptable for batch merges, silent loss is not;
/// every overwrite carries one of these into the batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// The contested node id
    pub id: String,
    /// Source file whose content was kept
    pub kept_source: String,
    /// Source file whose content was replaced
    pub dropped_source: String,
}

impl GraphDocument {
    /// Create an empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document holds no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node id is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CanonicalNode> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    #[inline]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut CanonicalNode> {
        self.nodes.get_mut(id)
    }

    /// Insert a node, replacing any previous holder of the id
    ///
    /// Returns a [`Collision`] when an existing node with **different
    /// content** was replaced; replacing identical content is silent.
    pub fn insert(&mut self, id: impl Into<String>, node: CanonicalNode) -> Option<Collision> {
        let id = id.into();
        match self.nodes.insert(id.clone(), node) {
            Some(previous) => {
                let current = &self.nodes[&id];
                if previous == *current {
                    None
                } else {
                    tracing::warn!(
                        id = %id,
                        kept = %current.source_file,
                        dropped = %previous.source_file,
                        "node collision, keeping later content"
                    );
                    Some(Collision {
                        id,
                        kept_source: current.source_file.clone(),
                        dropped_source: previous.source_file,
                    })
                }
            }
            None => None,
        }
    }

    /// Merge another document into this one, last write wins
    ///
    /// Returns every collision the merge produced, in input order.
    pub fn merge(&mut self, other: GraphDocument) -> Vec<Collision> {
        let mut collisions = Vec::new();
        for (id, node) in other.nodes {
            if let Some(collision) = self.insert(id, node) {
                collisions.push(collision);
            }
        }
        collisions
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    /// Returns [`DocumentError::Json`] on serialization failure.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string
    ///
    /// # Errors
    /// Returns [`DocumentError::Json`] on malformed input.
    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read a document from a JSON file
    ///
    /// # Errors
    /// Returns [`DocumentError`] on IO or parse failure.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let raw =
            std::fs::read_to_string(path).map_err(|e| DocumentError::io_error(path, e))?;
        Self::from_json(&raw)
    }

    /// Write the document to a JSON file, creating parent directories
    ///
    /// # Errors
    /// Returns [`DocumentError`] on IO or serialization failure.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::io_error(parent, e))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| DocumentError::io_error(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(name: &str, source: &str) -> CanonicalNode {
        CanonicalNode::new(name, "Requirement_General", source)
    }

    #[test]
    fn insert_fresh_id_is_not_a_collision() {
        let mut doc = GraphDocument::new();
        assert!(doc.insert("R1", node("first", "a.mdzip")).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn insert_identical_content_is_silent() {
        let mut doc = GraphDocument::new();
        doc.insert("R1", node("first", "a.mdzip"));
        assert!(doc.insert("R1", node("first", "a.mdzip")).is_none());
    }

    #[test]
    fn insert_differing_content_records_collision() {
        let mut doc = GraphDocument::new();
        doc.insert("R1", node("first", "a.mdzip"));
        let collision = doc.insert("R1", node("second", "b.mdzip")).unwrap();

        assert_eq!(collision.id, "R1");
        assert_eq!(collision.kept_source, "b.mdzip");
        assert_eq!(collision.dropped_source, "a.mdzip");
        // Later file's content won
        assert_eq!(doc.get("R1").unwrap().name, "second");
    }

    #[test]
    fn merge_collects_every_collision() {
        let mut left = GraphDocument::new();
        left.insert("R1", node("one", "a.mdzip"));
        left.insert("R2", node("two", "a.mdzip"));

        let mut right = GraphDocument::new();
        right.insert("R2", node("two-changed", "b.mdzip"));
        right.insert("R3", node("three", "b.mdzip"));

        let collisions = left.merge(right);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].id, "R2");
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn document_json_contract_shape() {
        let mut doc = GraphDocument::new();
        doc.insert("R1", node("one", "a.mdzip"));
        let json = doc.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["nodes"]["R1"]["name"].is_string());
        assert!(value["nodes"]["R1"]["incoming"].is_array());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/graph.json");

        let mut doc = GraphDocument::new();
        doc.insert("R1", node("one", "a.mdzip"));
        doc.write_to(&path).unwrap();

        let back = GraphDocument::read_from(&path).unwrap();
        assert_eq!(doc, back);
    }
}

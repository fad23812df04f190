//! Canonical node shape

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One node of the canonical graph
///
/// Requirements and diagram blocks both project onto this shape:
/// - requirements: `incoming` = derivation sources, `outgoing` = the
///   union of refine/satisfy/verify/trace targets, `text` and `xmi_id`
///   populated
/// - blocks: `incoming`/`outgoing` = literal per-connection signal sid
///   lists, `text`/`xmi_id` absent, containment recorded in `properties`
///
/// The node id is the key of the owning document map, not a field here;
/// the serialized shape is exactly the downstream loader contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNode {
    /// Human-facing name
    pub name: String,

    /// Node classification (e.g. `Requirement_Functional`, `Gain`)
    pub node_type: String,

    /// Requirement text, when the source carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Internal model identity (requirements only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmi_id: Option<String>,

    /// Ids of nodes this node receives edges from
    #[serde(default)]
    pub incoming: Vec<String>,

    /// Ids of nodes this node points at
    #[serde(default)]
    pub outgoing: Vec<String>,

    /// Remaining source attributes, insertion-ordered
    #[serde(default)]
    pub properties: IndexMap<String, String>,

    /// File or model the node was extracted from
    #[serde(default)]
    pub source_file: String,
}

impl CanonicalNode {
    /// Create a node with empty edges and properties
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        node_type: impl Into<String>,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            text: None,
            xmi_id: None,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            properties: IndexMap::new(),
            source_file: source_file.into(),
        }
    }

    /// Whether the node has any edge in either direction
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.incoming.is_empty() || !self.outgoing.is_empty()
    }

    /// Add an incoming edge unless it is already present
    ///
    /// Returns true when the edge was added.
    pub fn add_incoming(&mut self, id: &str) -> bool {
        if self.incoming.iter().any(|existing| existing == id) {
            return false;
        }
        self.incoming.push(id.to_string());
        true
    }

    /// Add an outgoing edge unless it is already present
    ///
    /// Returns true when the edge was added.
    pub fn add_outgoing(&mut self, id: &str) -> bool {
        if self.outgoing.iter().any(|existing| existing == id) {
            return false;
        }
        self.outgoing.push(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_disconnected() {
        let node = CanonicalNode::new("Root", "Requirement_General", "a.mdzip");
        assert!(!node.is_connected());
        assert!(node.text.is_none());
    }

    #[test]
    fn edge_insertion_is_idempotent() {
        let mut node = CanonicalNode::new("n", "t", "s");
        assert!(node.add_incoming("A"));
        assert!(!node.add_incoming("A"));
        assert!(node.add_outgoing("B"));
        assert!(!node.add_outgoing("B"));
        assert_eq!(node.incoming, vec!["A"]);
        assert_eq!(node.outgoing, vec!["B"]);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let node = CanonicalNode::new("n", "t", "s");
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("\"text\""));
        assert!(!json.contains("\"xmi_id\""));
    }

    #[test]
    fn roundtrips_through_json() {
        let mut node = CanonicalNode::new("Sensor limit", "Requirement_Performance", "reqs.mdzip");
        node.text = Some("Shall not exceed 10ms".to_string());
        node.xmi_id = Some("_abc123".to_string());
        node.add_outgoing("REQ-2");
        node.properties.insert("visibility".to_string(), "public".to_string());

        let json = serde_json::to_string(&node).unwrap();
        let back: CanonicalNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}

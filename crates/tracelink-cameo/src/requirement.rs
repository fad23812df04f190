//! Requirement entity and its canonical-graph projection

use indexmap::IndexMap;
use serde::Serialize;
use tracelink_graph::CanonicalNode;

/// A SysML requirement extracted from one model parse
///
/// `xmi_id` is the parse-internal identity (unique per parse);
/// `req_id` is the business-facing id and need not be unique across
/// files merged in a batch. The five relationship lists hold `xmi_id`
/// references after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Business-facing requirement id
    pub req_id: String,
    /// Internal model identity
    pub xmi_id: String,
    /// Element name
    pub name: String,
    /// Requirement text (placeholder when the model carries none)
    pub text: String,
    /// Classification (Functional, Performance, ..., General)
    pub req_type: String,
    /// Owning element id, when declared
    pub owner_id: Option<String>,
    /// Remaining element attributes
    pub properties: IndexMap<String, String>,
    /// Requirements this one derives from
    pub derives_from: Vec<String>,
    /// Requirements this one refines
    pub refines: Vec<String>,
    /// Requirements this one satisfies
    pub satisfies: Vec<String>,
    /// Requirements this one verifies
    pub verifies: Vec<String>,
    /// Requirements this one traces to
    pub traces_to: Vec<String>,
    /// Archive the requirement came from
    pub source_file: String,
}

impl Requirement {
    /// Total reference count across the five relationship lists
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.derives_from.len()
            + self.refines.len()
            + self.satisfies.len()
            + self.verifies.len()
            + self.traces_to.len()
    }

    /// Project onto the canonical node shape
    ///
    /// Incoming edges are the derivation sources; outgoing edges are
    /// the union of refine/satisfy/verify/trace targets. The caller
    /// keys the node by `req_id`.
    #[must_use]
    pub fn to_node(&self) -> CanonicalNode {
        let mut outgoing = Vec::with_capacity(
            self.refines.len() + self.satisfies.len() + self.verifies.len() + self.traces_to.len(),
        );
        outgoing.extend(self.refines.iter().cloned());
        outgoing.extend(self.satisfies.iter().cloned());
        outgoing.extend(self.verifies.iter().cloned());
        outgoing.extend(self.traces_to.iter().cloned());

        CanonicalNode {
            name: self.name.clone(),
            node_type: format!("Requirement_{}", self.req_type),
            text: Some(self.text.clone()),
            xmi_id: Some(self.xmi_id.clone()),
            incoming: self.derives_from.clone(),
            outgoing,
            properties: self.properties.clone(),
            source_file: self.source_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement() -> Requirement {
        Requirement {
            req_id: "SYS1.2".to_string(),
            xmi_id: "_r2".to_string(),
            name: "Sensor latency".to_string(),
            text: "Shall respond within 10ms".to_string(),
            req_type: "Performance".to_string(),
            owner_id: None,
            properties: IndexMap::new(),
            derives_from: vec!["_r1".to_string()],
            refines: vec!["_r3".to_string()],
            satisfies: vec![],
            verifies: vec!["_r4".to_string()],
            traces_to: vec!["_r5".to_string()],
            source_file: "reqs.mdzip".to_string(),
        }
    }

    #[test]
    fn relationship_count_sums_all_lists() {
        assert_eq!(requirement().relationship_count(), 4);
    }

    #[test]
    fn node_projection_splits_directions() {
        let node = requirement().to_node();
        assert_eq!(node.node_type, "Requirement_Performance");
        assert_eq!(node.incoming, vec!["_r1"]);
        assert_eq!(node.outgoing, vec!["_r3", "_r4", "_r5"]);
        assert_eq!(node.xmi_id.as_deref(), Some("_r2"));
        assert_eq!(node.text.as_deref(), Some("Shall respond within 10ms"));
    }
}

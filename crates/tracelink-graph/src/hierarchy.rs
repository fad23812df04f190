//! Hierarchy inference from dot-delimited ids
//!
//! Business ids like `TWCAT150.3.1.2` imply a tree: each id's immediate
//! parent is everything before the last dot. Applying the rule uniformly
//! to every id yields multi-level chains without explicit recursion.

use crate::document::GraphDocument;

/// Derive implicit parent/child edges from dotted node ids
///
/// For every id containing a dot whose candidate parent id exists in the
/// document, adds the parent to the child's incoming edges and the child
/// to the parent's outgoing edges. Both additions are idempotent, so
/// running inference repeatedly never duplicates entries. Dotless ids
/// are untouched. Returns the number of parent/child links added.
pub fn infer_hierarchy(doc: &mut GraphDocument) -> usize {
    let ids: Vec<String> = doc.nodes.keys().cloned().collect();
    let mut added = 0;

    for id in &ids {
        let Some((parent_id, _)) = id.rsplit_once('.') else {
            continue;
        };
        if !doc.contains(parent_id) {
            continue;
        }

        if let Some(child) = doc.get_mut(id) {
            if child.add_incoming(parent_id) {
                added += 1;
                tracing::debug!(child = %id, parent = %parent_id, "inferred hierarchy link");
            }
        }
        if let Some(parent) = doc.get_mut(parent_id) {
            parent.add_outgoing(id);
        }
    }

    if added > 0 {
        tracing::info!(links = added, "hierarchy inference complete");
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CanonicalNode;

    fn doc_with_ids(ids: &[&str]) -> GraphDocument {
        let mut doc = GraphDocument::new();
        for id in ids {
            doc.insert(*id, CanonicalNode::new(*id, "Requirement_General", "reqs.mdzip"));
        }
        doc
    }

    #[test]
    fn infers_immediate_parents_only() {
        let mut doc = doc_with_ids(&["A", "A.1", "A.1.2"]);
        let added = infer_hierarchy(&mut doc);

        assert_eq!(added, 2);
        assert_eq!(doc.get("A.1").unwrap().incoming, vec!["A"]);
        assert_eq!(doc.get("A.1.2").unwrap().incoming, vec!["A.1"]);
        assert!(doc.get("A").unwrap().incoming.is_empty());
        assert_eq!(doc.get("A").unwrap().outgoing, vec!["A.1"]);
        assert_eq!(doc.get("A.1").unwrap().outgoing, vec!["A.1.2"]);
    }

    #[test]
    fn missing_parent_adds_nothing() {
        let mut doc = doc_with_ids(&["B.1", "C"]);
        assert_eq!(infer_hierarchy(&mut doc), 0);
        assert!(doc.get("B.1").unwrap().incoming.is_empty());
    }

    #[test]
    fn dotless_ids_are_untouched() {
        let mut doc = doc_with_ids(&["A", "B"]);
        assert_eq!(infer_hierarchy(&mut doc), 0);
    }

    #[test]
    fn inference_is_idempotent() {
        let mut doc = doc_with_ids(&["A", "A.1"]);
        assert_eq!(infer_hierarchy(&mut doc), 1);
        assert_eq!(infer_hierarchy(&mut doc), 0);
        assert_eq!(doc.get("A.1").unwrap().incoming, vec!["A"]);
        assert_eq!(doc.get("A").unwrap().outgoing, vec!["A.1"]);
    }

    #[test]
    fn preserves_existing_edges() {
        let mut doc = doc_with_ids(&["A", "A.1"]);
        doc.get_mut("A.1").unwrap().add_incoming("OTHER");
        infer_hierarchy(&mut doc);
        assert_eq!(doc.get("A.1").unwrap().incoming, vec!["OTHER", "A"]);
    }
}

//! Two-phase relationship resolution
//!
//! Phase 1 collects raw supplier references by opaque id; phase 2
//! projects them through the requirement id set once the full set is
//! known. Source models permit forward references in arbitrary document
//! order, so resolution cannot be interleaved with collection.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracelink_markup::Element;

use crate::collect::ModelIndex;
use crate::requirement::Requirement;

/// Declared-type fragments that mark a traceability relationship
const RELATIONSHIP_TYPES: [&str; 4] = ["Dependency", "Abstraction", "Realization", "Trace"];

/// Classified relationship kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Client derives from supplier
    Derives,
    /// Client refines supplier
    Refines,
    /// Client satisfies supplier
    Satisfies,
    /// Client verifies supplier
    Verifies,
    /// Untyped trace (the default)
    Traces,
}

/// Phase 1: append raw supplier references onto their requirements
///
/// Scans every element whose declared type contains a relationship
/// fragment, requires both endpoint attributes, and discards
/// relationships whose client is not a known requirement.
pub(crate) fn collect_relationships(
    root: &Element,
    index: &ModelIndex<'_>,
    requirements: &mut IndexMap<String, Requirement>,
) {
    let mut collected = 0usize;

    for element in root.descendants() {
        let declared_type = element.attr("xmi:type").unwrap_or_default();
        if !RELATIONSHIP_TYPES.iter().any(|t| declared_type.contains(t)) {
            continue;
        }
        let (Some(client), Some(supplier)) = (element.attr("client"), element.attr("supplier"))
        else {
            continue;
        };
        let Some(requirement) = requirements.get_mut(client) else {
            continue;
        };

        let kind = classify(element, index);
        let target = match kind {
            RelationKind::Derives => &mut requirement.derives_from,
            RelationKind::Refines => &mut requirement.refines,
            RelationKind::Satisfies => &mut requirement.satisfies,
            RelationKind::Verifies => &mut requirement.verifies,
            RelationKind::Traces => &mut requirement.traces_to,
        };
        target.push(supplier.to_string());
        collected += 1;
    }

    tracing::debug!(references = collected, "collected raw relationships");
}

/// Classify a relationship element
///
/// Order: stereotype keyword applied to the element's own id, then a
/// keyword in the element's name, then the untyped default.
fn classify(element: &Element, index: &ModelIndex<'_>) -> RelationKind {
    if let Some(own_id) = element.attr("xmi:id") {
        if let Some(stereotype) = index.stereotype(own_id) {
            if let Some(kind) = kind_from_keyword(&stereotype.keyword.to_lowercase()) {
                return kind;
            }
        }
    }
    let name = element.attr("name").unwrap_or_default().to_lowercase();
    kind_from_keyword(&name).unwrap_or(RelationKind::Traces)
}

fn kind_from_keyword(lowered: &str) -> Option<RelationKind> {
    if lowered.contains("derive") {
        Some(RelationKind::Derives)
    } else if lowered.contains("refine") {
        Some(RelationKind::Refines)
    } else if lowered.contains("satisfy") {
        Some(RelationKind::Satisfies)
    } else if lowered.contains("verify") {
        Some(RelationKind::Verifies)
    } else {
        None
    }
}

/// Phase 2: retain only references naming another requirement
///
/// References may point at arbitrary model elements; only those equal
/// to a requirement's internal id survive. Returns the number of
/// dropped references (the resolution-miss tally).
pub(crate) fn resolve_references(requirements: &mut IndexMap<String, Requirement>) -> usize {
    let known: HashSet<String> = requirements.keys().cloned().collect();
    let mut misses = 0usize;

    for requirement in requirements.values_mut() {
        for list in [
            &mut requirement.derives_from,
            &mut requirement.refines,
            &mut requirement.satisfies,
            &mut requirement.verifies,
            &mut requirement.traces_to,
        ] {
            let before = list.len();
            list.retain(|reference| known.contains(reference));
            misses += before - list.len();
        }
    }

    if misses > 0 {
        tracing::debug!(misses, "dropped unresolvable relationship references");
    }
    misses
}

//! Stereotype & element collection
//!
//! One full traversal builds both lookup indices; every later phase is
//! a pure lookup against them. The index borrows the element tree, so
//! it is inherently scoped to the parse that built it.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracelink_markup::Element;

/// Stereotype keywords recognized on profile-application elements
///
/// Matched by containment in the element tag or declared type, not
/// exact equality, because vendor-export shapes vary
/// (`sysml:Requirement`, `StandardProfile:Trace`, `DeriveReqt`, ...).
const STEREOTYPE_KEYWORDS: [&str; 6] =
    ["Requirement", "Derive", "Refine", "Satisfy", "Verify", "Trace"];

/// One recognized stereotype application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereotypeApplication {
    /// The recognized keyword (`Requirement`, `Derive`, ...)
    pub keyword: &'static str,
    /// Stereotype-level requirement id, when present
    pub req_id: Option<String>,
    /// Stereotype-level requirement text, when present
    pub text: Option<String>,
    /// Stereotype-level source attribute, when present
    pub source: Option<String>,
}

/// Recorded facts about one identified element
#[derive(Debug, Clone)]
pub(crate) struct ElementInfo<'tree> {
    pub(crate) name: String,
    pub(crate) declared_type: String,
    pub(crate) source: Option<String>,
    pub(crate) element: &'tree Element,
}

/// The two parse-scoped lookup indices
///
/// (a) stereotype index: base-element id → recognized stereotype, with
///     any stereotype-level id/text/source attributes carried along
/// (b) element index: every element with an identity attribute →
///     name, declared type, source, and the element itself
#[derive(Debug)]
pub struct ModelIndex<'tree> {
    stereotypes: HashMap<String, StereotypeApplication>,
    elements: IndexMap<String, ElementInfo<'tree>>,
}

impl<'tree> ModelIndex<'tree> {
    /// Build both indices in a single pass over the tree
    #[must_use]
    pub fn collect(root: &'tree Element) -> Self {
        let mut stereotypes = HashMap::new();
        let mut elements = IndexMap::new();

        for element in root.descendants() {
            Self::collect_stereotype(element, &mut stereotypes);

            if let Some(xmi_id) = element.attr("xmi:id") {
                elements.insert(
                    xmi_id.to_string(),
                    ElementInfo {
                        name: element.attr("name").unwrap_or_default().to_string(),
                        declared_type: element.attr("xmi:type").unwrap_or_default().to_string(),
                        source: element.attr("source").map(str::to_string),
                        element,
                    },
                );
            }
        }

        tracing::debug!(
            stereotypes = stereotypes.len(),
            elements = elements.len(),
            "collected model indices"
        );
        Self {
            stereotypes,
            elements,
        }
    }

    fn collect_stereotype(
        element: &Element,
        stereotypes: &mut HashMap<String, StereotypeApplication>,
    ) {
        let declared_type = element.attr("xmi:type").unwrap_or_default();
        let keyword = STEREOTYPE_KEYWORDS
            .iter()
            .find(|kw| element.tag().contains(*kw) || declared_type.contains(*kw));
        let Some(keyword) = keyword else {
            return;
        };

        // The applied-to element is named by whichever base_* reference
        // this vendor emitted (base_Class, base_Element, base_Abstraction, ...)
        let base = element
            .attr_any(&["base_Class", "base_Element"])
            .or_else(|| {
                element
                    .attributes()
                    .find(|(key, _)| key.starts_with("base_"))
                    .map(|(_, value)| value)
            });
        let Some(base) = base else {
            return;
        };

        stereotypes.insert(
            base.to_string(),
            StereotypeApplication {
                keyword,
                req_id: element.attr_any(&["id", "Id"]).map(str::to_string),
                text: element.attr_any(&["text", "Text"]).map(str::to_string),
                source: element.attr("source").map(str::to_string),
            },
        );
    }

    /// Stereotype applied to an element id, if any
    #[inline]
    #[must_use]
    pub fn stereotype(&self, base_id: &str) -> Option<&StereotypeApplication> {
        self.stereotypes.get(base_id)
    }

    /// Element ids tagged with a given stereotype keyword, index order
    pub(crate) fn tagged_ids(&self, keyword: &'static str) -> impl Iterator<Item = &str> {
        // Iterate the element index so results follow document order
        self.elements
            .keys()
            .filter(move |id| {
                self.stereotypes
                    .get(*id)
                    .is_some_and(|s| s.keyword == keyword)
            })
            .map(String::as_str)
    }

    /// Recorded facts for an element id
    #[inline]
    #[must_use]
    pub(crate) fn element(&self, xmi_id: &str) -> Option<&ElementInfo<'tree>> {
        self.elements.get(xmi_id)
    }

    /// Total number of identified elements
    #[inline]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Total number of recognized stereotype applications
    #[inline]
    #[must_use]
    pub fn stereotype_count(&self) -> usize {
        self.stereotypes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(xml: &str) -> (Element, Vec<(String, String)>) {
        let root = Element::parse_str(xml).unwrap();
        let index = ModelIndex::collect(&root);
        let pairs = index
            .stereotypes
            .iter()
            .map(|(id, s)| (id.clone(), s.keyword.to_string()))
            .collect();
        (root, pairs)
    }

    #[test]
    fn requirement_stereotype_by_tag_containment() {
        let root = Element::parse_str(
            r#"<xmi><sysml:Requirement xmi:id="_s1" base_Class="_r1" id="SYS1" text="body"/></xmi>"#,
        )
        .unwrap();
        let index = ModelIndex::collect(&root);

        let stereo = index.stereotype("_r1").unwrap();
        assert_eq!(stereo.keyword, "Requirement");
        assert_eq!(stereo.req_id.as_deref(), Some("SYS1"));
        assert_eq!(stereo.text.as_deref(), Some("body"));
    }

    #[test]
    fn stereotype_by_declared_type_containment() {
        let (_root, pairs) = index_of(
            r#"<xmi><apply xmi:type="sysml:DeriveReqt" base_Abstraction="_d1"/></xmi>"#,
        );
        assert_eq!(pairs, vec![("_d1".to_string(), "Derive".to_string())]);
    }

    #[test]
    fn stereotype_without_base_is_ignored() {
        let (_root, pairs) = index_of(r#"<xmi><sysml:Requirement xmi:id="_s1"/></xmi>"#);
        assert!(pairs.is_empty());
    }

    #[test]
    fn element_index_records_all_identified() {
        let root = Element::parse_str(
            r#"<xmi>
                 <packagedElement xmi:type="uml:Class" xmi:id="_r1" name="First"/>
                 <packagedElement xmi:type="uml:Class" xmi:id="_r2" name="Second"/>
                 <anonymous name="no id"/>
               </xmi>"#,
        )
        .unwrap();
        let index = ModelIndex::collect(&root);

        assert_eq!(index.element_count(), 2);
        let info = index.element("_r1").unwrap();
        assert_eq!(info.name, "First");
        assert_eq!(info.declared_type, "uml:Class");
    }

    #[test]
    fn tagged_ids_follow_document_order() {
        let root = Element::parse_str(
            r#"<xmi>
                 <packagedElement xmi:id="_b" name="bee"/>
                 <packagedElement xmi:id="_a" name="ay"/>
                 <sysml:Requirement base_Class="_a"/>
                 <sysml:Requirement base_Class="_b"/>
               </xmi>"#,
        )
        .unwrap();
        let index = ModelIndex::collect(&root);
        let ids: Vec<_> = index.tagged_ids("Requirement").collect();
        assert_eq!(ids, vec!["_b", "_a"]);
    }
}

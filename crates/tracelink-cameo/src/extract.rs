//! Requirement extraction with ordered fallback resolution

use indexmap::IndexMap;
use tracelink_graph::PLACEHOLDER_TEXT;
use tracelink_markup::Element;

use crate::collect::{ElementInfo, ModelIndex};
use crate::requirement::Requirement;

/// Attribute names checked, in order, for requirement text
const TEXT_ATTRS: [&str; 4] = ["text", "body", "specification", "Text"];
/// Attribute names checked, in order, for the business id
const ID_ATTRS: [&str; 4] = ["id", "Id", "identifier", "ID"];
/// Attribute names checked for an explicit requirement type
const TYPE_ATTRS: [&str; 2] = ["type", "requirementType"];

/// Name filter for real requirements
///
/// Vendor models tag UI scraps and diagram labels with the same
/// stereotype; those arrive as empty or placeholder names, short
/// fragments, bare numbers (with or without internal spaces), or lone
/// operator characters, and are rejected.
#[must_use]
pub fn is_valid_requirement_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() || name == "Unnamed Requirement" {
        return false;
    }
    if trimmed.chars().count() <= 2 {
        return false;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if matches!(trimmed, "+" | "-" | "*" | "/" | "=" | "." | ",") {
        return false;
    }
    let without_spaces: String = trimmed.chars().filter(|c| *c != ' ').collect();
    if !without_spaces.is_empty() && without_spaces.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    true
}

/// Extract every stereotype-tagged, name-valid requirement
///
/// Returns requirements keyed by `xmi_id`, in document order.
pub(crate) fn extract_requirements(
    index: &ModelIndex<'_>,
    source_file: &str,
) -> IndexMap<String, Requirement> {
    let mut requirements = IndexMap::new();

    for xmi_id in index.tagged_ids("Requirement") {
        let Some(info) = index.element(xmi_id) else {
            continue;
        };
        if !is_valid_requirement_name(&info.name) {
            tracing::debug!(xmi_id = %xmi_id, name = %info.name, "rejected requirement name");
            continue;
        }
        let requirement = build_requirement(xmi_id, info, index, source_file);
        tracing::debug!(req_id = %requirement.req_id, name = %requirement.name, "extracted requirement");
        requirements.insert(xmi_id.to_string(), requirement);
    }

    if requirements.is_empty() {
        tracing::info!(source = %source_file, "no stereotype-tagged requirements found");
    }
    requirements
}

fn build_requirement(
    xmi_id: &str,
    info: &ElementInfo<'_>,
    index: &ModelIndex<'_>,
    source_file: &str,
) -> Requirement {
    let stereotype = index.stereotype(xmi_id);
    let element = info.element;
    let name = info.name.clone();

    let text = stereotype
        .and_then(|s| s.text.clone())
        .or_else(|| element.attr_any(&TEXT_ATTRS).map(str::to_string))
        .or_else(|| nested_comment_body(element))
        .unwrap_or_else(|| PLACEHOLDER_TEXT.to_string());

    let req_id = stereotype
        .and_then(|s| s.req_id.clone())
        .or_else(|| element.attr_any(&ID_ATTRS).map(str::to_string))
        .unwrap_or_else(|| generate_req_id(&name, xmi_id));

    let req_type = element
        .attr_any(&TYPE_ATTRS)
        .map(str::to_string)
        .unwrap_or_else(|| type_from_name(&name));

    let source = stereotype
        .and_then(|s| s.source.clone())
        .or_else(|| info.source.clone())
        .unwrap_or_else(|| source_file.to_string());

    Requirement {
        req_id,
        xmi_id: xmi_id.to_string(),
        name,
        text,
        req_type,
        owner_id: element.attr("owner").map(str::to_string),
        properties: remaining_properties(element),
        derives_from: Vec::new(),
        refines: Vec::new(),
        satisfies: Vec::new(),
        verifies: Vec::new(),
        traces_to: Vec::new(),
        source_file: source,
    }
}

/// Text fallback: body of the first nested ownedComment
fn nested_comment_body(element: &Element) -> Option<String> {
    element
        .find_descendants("ownedComment")
        .find_map(|comment| comment.attr("body"))
        .map(str::to_string)
}

/// Id fallback chain past the explicit attributes
///
/// A name already carrying a requirement-like token is used verbatim;
/// otherwise the name is sanitized into an id, and as a last resort the
/// internal identifier's suffix is used.
fn generate_req_id(name: &str, xmi_id: &str) -> String {
    let upper = name.to_uppercase();
    if upper.contains("REQ") || upper.contains("R-") {
        return name.to_string();
    }
    let clean: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if !clean.is_empty() {
        return format!("REQ-{clean}");
    }
    let suffix: String = xmi_id
        .chars()
        .rev()
        .take(8)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("REQ-{suffix}")
}

/// Type fallback: keyword scan of the name
fn type_from_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let req_type = if lower.contains("functional") {
        "Functional"
    } else if lower.contains("performance") || lower.contains("non-functional") {
        "Performance"
    } else if lower.contains("interface") {
        "Interface"
    } else if lower.contains("design") {
        "Design"
    } else if lower.contains("test") {
        "Test"
    } else if lower.contains("system") {
        "System"
    } else if lower.contains("user") {
        "User"
    } else {
        "General"
    };
    req_type.to_string()
}

/// Every attribute not consumed by the id/type/name/owner handling
fn remaining_properties(element: &Element) -> IndexMap<String, String> {
    element
        .attributes()
        .filter(|&(key, _)| {
            !key.contains(':')
                && key != "name"
                && key != "owner"
                && !ID_ATTRS.contains(&key)
                && !TYPE_ATTRS.contains(&key)
        })
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod name_filter {
        use super::*;

        #[test]
        fn accepts_real_names() {
            assert!(is_valid_requirement_name("Sensor latency bound"));
            assert!(is_valid_requirement_name("SYS-41"));
            assert!(is_valid_requirement_name(" padded name "));
        }

        #[test]
        fn rejects_empty_and_placeholder() {
            assert!(!is_valid_requirement_name(""));
            assert!(!is_valid_requirement_name("   "));
            assert!(!is_valid_requirement_name("Unnamed Requirement"));
        }

        #[test]
        fn rejects_short_names() {
            assert!(!is_valid_requirement_name("ab"));
            assert!(!is_valid_requirement_name(" x "));
            assert!(is_valid_requirement_name("abc"));
        }

        #[test]
        fn rejects_digits_with_or_without_spaces() {
            assert!(!is_valid_requirement_name("12345"));
            assert!(!is_valid_requirement_name("12 34 5"));
            assert!(is_valid_requirement_name("12a45"));
        }

        #[test]
        fn rejects_lone_punctuation() {
            for symbol in ["+", "-", "*", "/", "=", ".", ","] {
                assert!(!is_valid_requirement_name(symbol), "accepted {symbol}");
            }
        }
    }

    fn extract_one(xml: &str) -> Requirement {
        let root = Element::parse_str(xml).unwrap();
        let index = ModelIndex::collect(&root);
        let reqs = extract_requirements(&index, "test.mdzip");
        assert_eq!(reqs.len(), 1, "expected exactly one requirement");
        reqs.into_iter().next().unwrap().1
    }

    #[test]
    fn stereotype_text_wins_over_element_text() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Power limit" text="element text"/>
                 <sysml:Requirement base_Class="_r1" text="stereotype text"/>
               </xmi>"#,
        );
        assert_eq!(req.text, "stereotype text");
    }

    #[test]
    fn element_text_attrs_in_order() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Power limit" specification="from spec attr"/>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(req.text, "from spec attr");
    }

    #[test]
    fn nested_comment_body_as_text_fallback() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Power limit">
                   <ownedComment xmi:id="_c1" body="comment body"/>
                 </packagedElement>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(req.text, "comment body");
    }

    #[test]
    fn placeholder_when_no_text_anywhere() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Power limit"/>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(req.text, PLACEHOLDER_TEXT);
    }

    #[test]
    fn stereotype_id_wins() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Power limit" id="ELEM-1"/>
                 <sysml:Requirement base_Class="_r1" id="SYS-1"/>
               </xmi>"#,
        );
        assert_eq!(req.req_id, "SYS-1");
    }

    #[test]
    fn req_like_name_used_as_id() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="REQ Power Limit"/>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(req.req_id, "REQ Power Limit");
    }

    #[test]
    fn sanitized_name_id_fallback() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_abcdef123456" name="Power limit!"/>
                 <sysml:Requirement base_Class="_abcdef123456"/>
               </xmi>"#,
        );
        assert_eq!(req.req_id, "REQ-Powerlimit");
    }

    #[test]
    fn type_from_explicit_attr_then_name_then_default() {
        let explicit = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Power limit" requirementType="Safety"/>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(explicit.req_type, "Safety");

        let from_name = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Interface timing"/>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(from_name.req_type, "Interface");

        let default = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="Power limit"/>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(default.req_type, "General");
    }

    #[test]
    fn properties_exclude_consumed_attributes() {
        let req = extract_one(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" xmi:type="uml:Class" name="Power limit"
                                  id="SYS-1" owner="_pkg" visibility="public" priority="high"/>
                 <sysml:Requirement base_Class="_r1"/>
               </xmi>"#,
        );
        assert_eq!(req.owner_id.as_deref(), Some("_pkg"));
        assert_eq!(req.properties.len(), 2);
        assert_eq!(req.properties["visibility"], "public");
        assert_eq!(req.properties["priority"], "high");
    }

    #[test]
    fn invalid_names_are_filtered_out() {
        let root = Element::parse_str(
            r#"<xmi>
                 <packagedElement xmi:id="_r1" name="+"/>
                 <packagedElement xmi:id="_r2" name="42"/>
                 <packagedElement xmi:id="_r3" name="Real requirement"/>
                 <sysml:Requirement base_Class="_r1"/>
                 <sysml:Requirement base_Class="_r2"/>
                 <sysml:Requirement base_Class="_r3"/>
               </xmi>"#,
        )
        .unwrap();
        let index = ModelIndex::collect(&root);
        let reqs = extract_requirements(&index, "test.mdzip");
        assert_eq!(reqs.len(), 1);
        assert!(reqs.contains_key("_r3"));
    }
}

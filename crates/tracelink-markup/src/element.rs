//! Owned XML element tree
//!
//! Provides [`Element`], the parse-scoped tree both model parsers walk.
//! Lookups distinguish **direct children** from **descendants**: line
//! elements in block diagrams carry nested branches whose sub-elements
//! must not shadow the line's own, so the distinction is load-bearing.

use indexmap::IndexMap;

use crate::error::MarkupError;
use crate::reader;

/// A single element of a materialized XML document
///
/// Attributes keep their raw (possibly prefixed) names and document
/// order. Text is the concatenation of the element's own text nodes,
/// trimmed; `None` when the element has no text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub(crate) fn new(tag: String, attributes: IndexMap<String, String>) -> Self {
        Self {
            tag,
            attributes,
            children: Vec::new(),
            text: None,
        }
    }

    /// Parse a UTF-8 document into its root element
    ///
    /// # Errors
    /// Returns [`MarkupError`] on syntax errors or an empty document.
    pub fn parse_str(input: &str) -> Result<Self, MarkupError> {
        reader::parse_document(input)
    }

    /// Parse raw bytes into the root element
    ///
    /// # Errors
    /// Returns [`MarkupError::Encoding`] when the payload is not UTF-8,
    /// or any error of [`Element::parse_str`].
    pub fn parse_bytes(input: &[u8]) -> Result<Self, MarkupError> {
        let text = std::str::from_utf8(input)?;
        Self::parse_str(text)
    }

    /// Raw tag name, prefix included (e.g. `uml:ownedComment`)
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Tag name with any namespace prefix stripped
    #[inline]
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_part(&self.tag)
    }

    /// Attribute value by exact (raw) name
    #[inline]
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First non-empty value among several candidate attribute names
    ///
    /// Vendor exports disagree on attribute spelling (`id` vs `Id` vs
    /// `identifier`); resolution order is the caller's fallback chain.
    #[must_use]
    pub fn attr_any(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.attr(name))
            .find(|value| !value.is_empty())
    }

    /// Attribute value matched by local name, ignoring the prefix
    ///
    /// `attr_local("id")` finds `xmi:id` but also a plain `id`; use
    /// [`Element::attr`] when the two must stay distinct.
    #[must_use]
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == local)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in document order
    #[inline]
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Trimmed text content, if any
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Direct children in document order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First **direct** child with the given local name
    #[must_use]
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local)
    }

    /// All **direct** children with the given local name
    #[inline]
    pub fn children_named<'a, 'b>(
        &'a self,
        local: &'b str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'b> {
        self.children.iter().filter(move |c| c.local_name() == local)
    }

    /// First direct child matching local name and an attribute value
    ///
    /// Block-diagram descriptors key property children as
    /// `<P Name="Position">...</P>`; this is the lookup for that shape.
    #[must_use]
    pub fn child_with_attr(&self, local: &str, attr: &str, value: &str) -> Option<&Element> {
        self.children_named(local).find(|c| c.attr(attr) == Some(value))
    }

    /// Pre-order traversal over this element and every descendant
    #[inline]
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All descendants (self excluded) with the given local name
    pub fn find_descendants<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants()
            .skip(1)
            .filter(move |e| e.local_name() == local)
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub(crate) fn append_text(&mut self, fragment: &str) {
        let trimmed = fragment.trim();
        if trimmed.is_empty() {
            return;
        }
        match &mut self.text {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(trimmed);
            }
            None => self.text = Some(trimmed.to_string()),
        }
    }
}

/// Pre-order iterator over an element subtree
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        // Reverse so document order is preserved
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

//! Tracelink Markup
//!
//! Owned XML element tree for the model-file parsers.
//!
//! Vendor exports (Cameo XMI, Simulink system descriptors) need repeated
//! lookups against a fully materialized tree: indices are built in one
//! traversal and later phases resolve ids against them without re-reading
//! the document. A streaming reader does not fit that access pattern, so
//! the `quick-xml` event stream is materialized into [`Element`] once per
//! parse and discarded with it.
//!
//! # Example
//!
//! ```
//! use tracelink_markup::Element;
//!
//! let root = Element::parse_str(r#"<model><Block SID="1" Name="Gain"/></model>"#).unwrap();
//! let block = root.child("Block").unwrap();
//! assert_eq!(block.attr("SID"), Some("1"));
//! ```

mod element;
mod error;
mod reader;

pub use element::{Descendants, Element};
pub use error::MarkupError;

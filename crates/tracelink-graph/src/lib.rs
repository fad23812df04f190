//! Tracelink Graph
//!
//! The canonical traceability graph every extractor converges on.
//!
//! # Core Concepts
//!
//! - [`CanonicalNode`]: the single node shape shared by requirements and
//!   diagram blocks — heterogeneous entities unify through explicit
//!   adapter functions in the extractor crates, never inheritance
//! - [`GraphDocument`]: the `{ "nodes": { id: node } }` JSON contract
//!   consumed by downstream loaders, with last-write-wins merge and
//!   [`Collision`] records
//! - [`infer_hierarchy`]: implicit parent/child edges derived from
//!   dot-delimited business ids
//! - [`validate`]: non-blocking quality report over a document
//!
//! # Example
//!
//! ```
//! use tracelink_graph::{CanonicalNode, GraphDocument, infer_hierarchy};
//!
//! let mut doc = GraphDocument::new();
//! doc.insert("SYS1", CanonicalNode::new("Root", "Requirement_System", "spec.mdzip"));
//! doc.insert("SYS1.1", CanonicalNode::new("Child", "Requirement_System", "spec.mdzip"));
//! let added = infer_hierarchy(&mut doc);
//! assert_eq!(added, 1);
//! ```

mod document;
mod error;
mod hierarchy;
mod node;
mod validate;

pub use document::{Collision, GraphDocument};
pub use error::DocumentError;
pub use hierarchy::infer_hierarchy;
pub use node::CanonicalNode;
pub use validate::{validate, QualityReport, QualityStats, Severity, ValidationIssue};

/// Fallback text recorded on requirements whose model carries none
pub const PLACEHOLDER_TEXT: &str = "No text specified";

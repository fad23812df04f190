//! Tracelink Archive
//!
//! Raw-payload access for the extraction pipeline:
//!
//! - [`Container`]: zip-compatible model containers (`.mdzip`, `.slxc`)
//!   with fixed-entry lookup
//! - [`DiagramTree`]: directory layout of a block-diagram model (root
//!   descriptor plus subsystem descriptors)
//! - [`read_source_files`]: recursive source collection from an
//!   extracted tree
//! - [`extract_cached`]: idempotent extraction of code-gen archives into
//!   a reusable sibling directory
//!
//! Every failure surfaces as [`ArchiveError`], which is fatal to the one
//! input file it names and nothing else.

mod cache;
mod container;
mod error;
mod tree;

pub use cache::{extract_cached, extraction_dir};
pub use container::Container;
pub use error::ArchiveError;
pub use tree::{read_source_files, DiagramTree};

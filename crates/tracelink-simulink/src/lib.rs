//! Tracelink Simulink
//!
//! Block connectivity and generated-code mapping for Simulink models.
//!
//! Two independent flows share this crate:
//!
//! - **Model analysis** ([`SimulinkModel`]): walks a model directory
//!   (root descriptor plus `systems/*.xml`), yields [`Block`]s and
//!   signal [`Connection`]s — branch fan-out included — and projects
//!   them onto the canonical graph.
//! - **Code mapping** ([`analyze_codegen_archive`]): extracts a
//!   code-gen archive through the reusable cache and groups every
//!   `'<Path>/Name'` traceability comment in the generated C sources
//!   by `(file, block path)`.

mod analyzer;
mod codemap;
mod diagram;
mod error;
mod model;

pub use analyzer::{SimulinkModel, ROOT_DESCRIPTOR, SUBSYSTEM_DIR};
pub use codemap::{
    analyze_codegen_archive, scan_sources, CodeMapping, CodeMappingDocument, CodeReference,
};
pub use error::SimulinkError;
pub use model::{Block, Connection, Endpoint, PortKind};

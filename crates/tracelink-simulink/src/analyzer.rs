//! End-to-end analysis of one model directory

use std::path::Path;

use indexmap::IndexMap;
use tracelink_archive::DiagramTree;
use tracelink_graph::{CanonicalNode, GraphDocument};
use tracelink_markup::Element;

use crate::diagram::parse_system;
use crate::error::SimulinkError;
use crate::model::{Block, Connection};

/// Conventional root descriptor name inside a model directory
pub const ROOT_DESCRIPTOR: &str = "blockdiagram.xml";
/// Conventional subdirectory holding subsystem descriptors
pub const SUBSYSTEM_DIR: &str = "systems";

/// The parsed content of one block-diagram model
#[derive(Debug, Clone)]
pub struct SimulinkModel {
    /// Model name derived from the directory layout
    pub model_name: String,
    /// Model-level metadata from the root descriptor
    pub model_info: IndexMap<String, String>,
    /// Blocks keyed by sid, document order
    pub blocks: IndexMap<String, Block>,
    /// Signal connections in discovery order
    pub connections: Vec<Connection>,
    /// Lines/branches skipped for unparseable endpoints
    pub skipped_endpoints: usize,
}

impl SimulinkModel {
    /// Load and parse a model directory
    ///
    /// The root descriptor contributes model-level metadata only; every
    /// subsystem descriptor contributes blocks and lines.
    ///
    /// # Errors
    /// [`SimulinkError::Archive`] when the tree or root descriptor is
    /// missing; [`SimulinkError::Parse`] on malformed descriptors.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SimulinkError> {
        let dir = dir.as_ref();
        tracing::info!(dir = %dir.display(), "loading block-diagram model");
        let tree = DiagramTree::open(dir, ROOT_DESCRIPTOR, SUBSYSTEM_DIR)?;

        // Model directories conventionally sit at <ModelName>/simulink/
        let model_name = match dir.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.eq_ignore_ascii_case("simulink") => dir
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.to_string()),
            Some(name) => name.to_string(),
            None => dir.display().to_string(),
        };

        let root_payload = read_descriptor(&tree.root_descriptor)?;
        let model_info = parse_model_info(&root_payload)?;

        let mut blocks = IndexMap::new();
        let mut connections = Vec::new();
        let mut skipped_endpoints = 0;
        for descriptor in &tree.subsystem_descriptors {
            let system_name = descriptor
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::debug!(descriptor = %descriptor.display(), "parsing system descriptor");
            let payload = read_descriptor(descriptor)?;
            let root = Element::parse_str(&payload)?;
            skipped_endpoints += parse_system(&root, &system_name, &mut blocks, &mut connections);
        }

        tracing::info!(
            model = %model_name,
            blocks = blocks.len(),
            connections = connections.len(),
            skipped = skipped_endpoints,
            "model analysis complete"
        );
        Ok(Self {
            model_name,
            model_info,
            blocks,
            connections,
            skipped_endpoints,
        })
    }

    /// Project blocks and connections onto the canonical graph
    ///
    /// Nodes are keyed by sid; incoming/outgoing are the literal
    /// per-connection sid lists. Connections naming a sid outside the
    /// block set contribute no edge.
    #[must_use]
    pub fn to_graph(&self) -> GraphDocument {
        let mut doc = GraphDocument::new();

        for (sid, block) in &self.blocks {
            let mut node = CanonicalNode::new(&block.name, &block.block_type, &self.model_name);
            node.properties
                .insert("parent_system".to_string(), block.parent_system.clone());
            node.properties
                .insert("model_name".to_string(), self.model_name.clone());
            for (key, value) in &block.properties {
                node.properties.insert(key.clone(), value.clone());
            }
            doc.insert(sid.clone(), node);
        }

        for connection in &self.connections {
            let source = connection.source_block.as_str();
            let dest = connection.dest_block.as_str();
            if !doc.contains(source) || !doc.contains(dest) {
                continue;
            }
            if let Some(node) = doc.get_mut(source) {
                node.add_outgoing(dest);
            }
            if let Some(node) = doc.get_mut(dest) {
                node.add_incoming(source);
            }
        }

        doc
    }
}

fn read_descriptor(path: &Path) -> Result<String, SimulinkError> {
    std::fs::read_to_string(path)
        .map_err(|e| SimulinkError::Archive(tracelink_archive::ArchiveError::io_error(path, e)))
}

/// Model-level metadata: `P` children of the root descriptor's `Model`
fn parse_model_info(payload: &str) -> Result<IndexMap<String, String>, SimulinkError> {
    let root = Element::parse_str(payload)?;
    let mut info = IndexMap::new();
    for model in root.descendants().filter(|e| e.local_name() == "Model") {
        for prop in model.find_descendants("P") {
            if let Some(name) = prop.attr("Name") {
                info.insert(name.to_string(), prop.text().unwrap_or_default().to_string());
            }
        }
    }
    Ok(info)
}

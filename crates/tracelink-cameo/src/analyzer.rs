//! End-to-end analysis of one requirements archive

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tracelink_archive::Container;
use tracelink_graph::GraphDocument;
use tracelink_markup::Element;

use crate::collect::ModelIndex;
use crate::error::CameoError;
use crate::extract::extract_requirements;
use crate::relations::{collect_relationships, resolve_references};
use crate::requirement::Requirement;

/// Fixed model-definition entry inside a `.mdzip` container
pub const MODEL_ENTRY: &str = "com.nomagic.magicdraw.uml_model.model";

/// Counters from one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Extracted requirements
    pub requirements: usize,
    /// Identified elements in the model (requirements included)
    pub elements: usize,
    /// Relationship references dropped during resolution
    pub resolution_misses: usize,
}

/// The parsed content of one requirements archive
///
/// All contained entities are owned by this parse; nothing escapes
/// except through the canonical-graph projection.
#[derive(Debug, Clone)]
pub struct CameoModel {
    /// Archive stem the model came from
    pub source_file: String,
    /// Requirements keyed by `xmi_id`, document order
    pub requirements: IndexMap<String, Requirement>,
    /// Parse counters
    pub stats: ParseStats,
}

impl CameoModel {
    /// Open an archive, locate the model entry, and parse it
    ///
    /// # Errors
    /// [`CameoError::Archive`] when the container is missing/corrupt or
    /// lacks the model entry; [`CameoError::Parse`] on malformed XMI.
    /// Either is fatal to this file only.
    pub fn parse_archive(path: impl AsRef<Path>) -> Result<Self, CameoError> {
        let path = path.as_ref();
        let source_file = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!(archive = %path.display(), "analyzing requirements archive");

        let mut container = Container::open(path)?;
        let payload = container.read_entry(MODEL_ENTRY)?;
        Self::parse_payload(&payload, &source_file)
    }

    /// Parse a raw model payload
    ///
    /// Phases are strictly ordered: both indices are fully built before
    /// extraction runs, and collection finishes across the whole tree
    /// before resolution starts.
    ///
    /// # Errors
    /// [`CameoError::Parse`] on malformed XMI.
    pub fn parse_payload(payload: &[u8], source_file: &str) -> Result<Self, CameoError> {
        let root = Element::parse_bytes(payload)?;

        let index = ModelIndex::collect(&root);
        let mut requirements = extract_requirements(&index, source_file);
        collect_relationships(&root, &index, &mut requirements);
        let resolution_misses = resolve_references(&mut requirements);

        let stats = ParseStats {
            requirements: requirements.len(),
            elements: index.element_count(),
            resolution_misses,
        };
        tracing::info!(
            source = %source_file,
            requirements = stats.requirements,
            elements = stats.elements,
            misses = stats.resolution_misses,
            "parse complete"
        );

        Ok(Self {
            source_file: source_file.to_string(),
            requirements,
            stats,
        })
    }

    /// Project every requirement onto the canonical graph
    ///
    /// Nodes are keyed by `req_id`. A `req_id` shared by two
    /// requirements of the same file is last-write-wins here; cross-file
    /// collision accounting belongs to the batch layer.
    #[must_use]
    pub fn to_graph(&self) -> GraphDocument {
        let mut doc = GraphDocument::new();
        for requirement in self.requirements.values() {
            doc.insert(requirement.req_id.clone(), requirement.to_node());
        }
        doc
    }
}

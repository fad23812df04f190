//! Generated-code traceability mapping
//!
//! Code generators stamp every emitted region with a comment naming
//! the originating block, e.g. `/* Gain: '<S1>/K' */`. Scanning the
//! recovered sources for those tokens yields a (file, block-path)
//! keyed mapping back into the model.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracelink_archive::{extract_cached, read_source_files};

use crate::error::SimulinkError;

/// Block references embedded in comments: `'<Path>/Name'`
static BLOCK_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'<([^>]+)>/([^']+)'").expect("block reference pattern compiles"));

/// One matched source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeReference {
    /// 1-based line number
    pub line: usize,
    /// Trimmed verbatim line text
    pub code: String,
}

/// All references to one block path within one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeMapping {
    /// Source file, relative to the extraction root
    pub file_path: String,
    /// Full block path, e.g. `<S1>/K`
    pub block_path: String,
    /// Last path segment, e.g. `K`
    pub block_name: String,
    /// `file:block_path` display key
    pub location: String,
    /// Every matching line, in file order
    pub code_references: Vec<CodeReference>,
}

/// The exported code-mapping document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeMappingDocument {
    /// Archive the sources came from
    pub source_file: String,
    /// Scanned source files
    pub c_files: Vec<String>,
    /// Grouped mappings, in first-seen order
    pub mappings: Vec<CodeMapping>,
}

impl CodeMappingDocument {
    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    /// Returns `serde_json::Error` on serialization failure.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Extract a code-gen archive and map its sources
///
/// Extraction goes through the reusable cache directory, so repeated
/// analysis of the same archive skips the unzip.
///
/// # Errors
/// [`SimulinkError::Archive`] when the archive is missing or corrupt.
pub fn analyze_codegen_archive(path: impl AsRef<Path>) -> Result<CodeMappingDocument, SimulinkError> {
    let path = path.as_ref();
    tracing::info!(archive = %path.display(), "analyzing code-gen archive");

    let extracted = extract_cached(path)?;
    let sources = read_source_files(&extracted, "c")?;
    Ok(scan_sources(&sources, &path.display().to_string()))
}

/// Scan already-loaded sources for block references
///
/// Every match becomes an occurrence under its `(file, block path)`
/// key; one key accumulates every matching line across the file.
#[must_use]
pub fn scan_sources(sources: &[(String, String)], source_file: &str) -> CodeMappingDocument {
    let mut grouped: IndexMap<(String, String), Vec<CodeReference>> = IndexMap::new();

    for (file_path, content) in sources {
        for (index, line) in content.lines().enumerate() {
            for captures in BLOCK_REF.captures_iter(line) {
                let block_path = format!("<{}>/{}", &captures[1], &captures[2]);
                grouped
                    .entry((file_path.clone(), block_path))
                    .or_default()
                    .push(CodeReference {
                        line: index + 1,
                        code: line.trim().to_string(),
                    });
            }
        }
    }

    let mappings = grouped
        .into_iter()
        .map(|((file_path, block_path), code_references)| {
            let block_name = block_path
                .rsplit('/')
                .next()
                .unwrap_or(block_path.as_str())
                .to_string();
            let location = format!("{file_path}:{block_path}");
            CodeMapping {
                file_path,
                block_path,
                block_name,
                location,
                code_references,
            }
        })
        .collect::<Vec<_>>();

    tracing::info!(
        files = sources.len(),
        mappings = mappings.len(),
        "code mapping complete"
    );
    CodeMappingDocument {
        source_file: source_file.to_string(),
        c_files: sources.iter().map(|(path, _)| path.clone()).collect(),
        mappings,
    }
}

//! Directory-tree reading for block-diagram models and extracted sources

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ArchiveError;

/// On-disk layout of one block-diagram model
///
/// A model directory holds one root descriptor plus zero-or-more
/// subsystem descriptors under a conventional subdirectory.
#[derive(Debug, Clone)]
pub struct DiagramTree {
    /// Path to the root descriptor file
    pub root_descriptor: PathBuf,
    /// Subsystem descriptor files, sorted by file name
    pub subsystem_descriptors: Vec<PathBuf>,
}

impl DiagramTree {
    /// Locate a model's descriptors under `dir`
    ///
    /// # Errors
    /// [`ArchiveError::NotFound`] when the directory or its root
    /// descriptor is absent. A missing subsystem directory is not an
    /// error; such a model simply has no subsystems.
    pub fn open(
        dir: impl AsRef<Path>,
        root_name: &str,
        subsystem_dir: &str,
    ) -> Result<Self, ArchiveError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ArchiveError::not_found(dir));
        }

        let root_descriptor = dir.join(root_name);
        if !root_descriptor.is_file() {
            return Err(ArchiveError::not_found(root_descriptor));
        }

        let mut subsystem_descriptors = Vec::new();
        let subsystems = dir.join(subsystem_dir);
        if subsystems.is_dir() {
            let entries = std::fs::read_dir(&subsystems)
                .map_err(|e| ArchiveError::io_error(&subsystems, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| ArchiveError::io_error(&subsystems, e))?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("xml") {
                    subsystem_descriptors.push(path);
                }
            }
        }
        subsystem_descriptors.sort();

        tracing::debug!(
            dir = %dir.display(),
            subsystems = subsystem_descriptors.len(),
            "located diagram tree"
        );
        Ok(Self {
            root_descriptor,
            subsystem_descriptors,
        })
    }
}

/// Recursively collect source files with the given extension
///
/// Returns (relative path, content) pairs sorted by path; separators are
/// normalized to `/` so results are stable across platforms. Files that
/// cannot be read are skipped with a warning rather than failing the
/// whole tree.
///
/// # Errors
/// [`ArchiveError::NotFound`] when `dir` does not exist.
pub fn read_source_files(
    dir: impl AsRef<Path>,
    extension: &str,
) -> Result<Vec<(String, String)>, ArchiveError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ArchiveError::not_found(dir));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let relative = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        match std::fs::read_to_string(path) {
            Ok(content) => files.push((relative, content)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            }
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

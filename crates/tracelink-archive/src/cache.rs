//! Idempotent extraction cache for code-gen archives
//!
//! Code-gen containers are large and re-analyzed often; extraction goes
//! to a persistent sibling directory keyed by the archive name so
//! repeated runs reuse it. Skip-on-populated makes re-extraction a
//! no-op; an empty stale directory is replaced.

use std::path::{Path, PathBuf};

use crate::container::Container;
use crate::error::ArchiveError;

/// Extraction target for an archive: `<stem>_extracted` next to it
#[must_use]
pub fn extraction_dir(archive_path: &Path) -> PathBuf {
    let stem = archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    archive_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{stem}_extracted"))
}

/// Extract an archive into its cache directory, reusing prior results
///
/// Returns the populated extraction directory. When the directory
/// already holds any file, extraction is skipped entirely; when it
/// exists but is empty it is removed and re-extracted.
///
/// # Errors
/// Returns [`ArchiveError`] when the archive is missing/corrupt or the
/// target directory cannot be written.
pub fn extract_cached(archive_path: impl AsRef<Path>) -> Result<PathBuf, ArchiveError> {
    let archive_path = archive_path.as_ref();
    let dest = extraction_dir(archive_path);

    if dest.is_dir() {
        if dir_has_files(&dest)? {
            tracing::debug!(dest = %dest.display(), "reusing extracted archive");
            return Ok(dest);
        }
        std::fs::remove_dir_all(&dest).map_err(|e| ArchiveError::io_error(&dest, e))?;
    }

    std::fs::create_dir_all(&dest).map_err(|e| ArchiveError::io_error(&dest, e))?;
    let mut container = Container::open(archive_path)?;
    container.extract_all(&dest)?;
    tracing::info!(
        archive = %archive_path.display(),
        dest = %dest.display(),
        "extracted archive"
    );
    Ok(dest)
}

fn dir_has_files(dir: &Path) -> Result<bool, ArchiveError> {
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}

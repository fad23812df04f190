//! Error types for Cameo extraction

use tracelink_archive::ArchiveError;
use tracelink_markup::MarkupError;

/// Errors extracting requirements from one archive
///
/// Fatal to the single input file; batch orchestration records the
/// failure and moves on.
#[derive(Debug, thiserror::Error)]
pub enum CameoError {
    /// Container missing, corrupt, or lacking the model entry
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Model entry is not well-formed XMI
    #[error("parse error: {0}")]
    Parse(#[from] MarkupError),
}

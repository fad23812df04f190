//! Error types for Simulink analysis

use tracelink_archive::ArchiveError;
use tracelink_markup::MarkupError;

/// Errors analyzing one model directory or code-gen archive
///
/// Fatal to the single input only; batch orchestration records the
/// failure and continues.
#[derive(Debug, thiserror::Error)]
pub enum SimulinkError {
    /// Model tree or archive missing, corrupt, or unreadable
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Descriptor file is not well-formed XML
    #[error("parse error: {0}")]
    Parse(#[from] MarkupError),
}

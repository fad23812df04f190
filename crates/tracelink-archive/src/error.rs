//! Error types for archive and tree access

use std::path::PathBuf;

/// Errors opening or reading a model container or tree
///
/// Fatal to the single input file only; batch orchestration records the
/// failure and continues with the remaining inputs.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Input file or directory does not exist
    #[error("input not found: {path}")]
    NotFound { path: PathBuf },

    /// Expected payload entry is absent from the container
    #[error("entry '{entry}' not found in {archive}")]
    MissingEntry { archive: PathBuf, entry: String },

    /// Container is not a readable zip archive
    #[error("corrupt archive {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// IO failure while reading or extracting
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    /// Create a not-found error for a path
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a corrupt-archive error for a path
    pub fn corrupt(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }

    /// Create an IO error for a path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_display() {
        let err = ArchiveError::MissingEntry {
            archive: PathBuf::from("model.mdzip"),
            entry: "payload.xml".to_string(),
        };
        assert_eq!(err.to_string(), "entry 'payload.xml' not found in model.mdzip");
    }

    #[test]
    fn not_found_display() {
        let err = ArchiveError::not_found("missing.slxc");
        assert!(err.to_string().contains("missing.slxc"));
    }
}

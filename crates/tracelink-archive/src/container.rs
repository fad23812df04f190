//! Zip-compatible container access

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// An opened zip-compatible model container
///
/// Both input container formats (requirements `.mdzip`, code-gen
/// `.slxc`) are ordinary zip files with conventional entry names.
pub struct Container {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl Container {
    /// Open a container file
    ///
    /// # Errors
    /// [`ArchiveError::NotFound`] when the file does not exist,
    /// [`ArchiveError::Corrupt`] when it is not a readable zip.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArchiveError::not_found(path));
        }
        let file = File::open(path).map_err(|e| ArchiveError::io_error(path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| ArchiveError::corrupt(path, e))?;
        tracing::debug!(path = %path.display(), entries = archive.len(), "opened container");
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Path this container was opened from
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in archive order
    #[must_use]
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Whether the container holds the named entry
    #[must_use]
    pub fn has_entry(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Read one entry's raw bytes
    ///
    /// # Errors
    /// [`ArchiveError::MissingEntry`] when the entry is absent,
    /// [`ArchiveError::Corrupt`] on decompression failure.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(ArchiveError::MissingEntry {
                    archive: self.path.clone(),
                    entry: name.to_string(),
                });
            }
            Err(e) => return Err(ArchiveError::corrupt(&self.path, e)),
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ArchiveError::io_error(&self.path, e))?;
        Ok(bytes)
    }

    /// Read every entry with the given extension as UTF-8 text
    ///
    /// Returns (entry name, content) pairs in archive order. Entries
    /// with invalid UTF-8 are decoded lossily; generated sources are
    /// expected to be plain ASCII.
    ///
    /// # Errors
    /// Returns [`ArchiveError`] on read failures.
    pub fn entries_with_extension(
        &mut self,
        extension: &str,
    ) -> Result<Vec<(String, String)>, ArchiveError> {
        let names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| Path::new(name).extension().and_then(|e| e.to_str()) == Some(extension))
            .map(str::to_string)
            .collect();

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let bytes = self.read_entry(&name)?;
            entries.push((name, String::from_utf8_lossy(&bytes).into_owned()));
        }
        Ok(entries)
    }

    /// Extract the full container into a directory
    ///
    /// # Errors
    /// Returns [`ArchiveError::Corrupt`] on extraction failure.
    pub fn extract_all(&mut self, dest: &Path) -> Result<(), ArchiveError> {
        self.archive
            .extract(dest)
            .map_err(|e| ArchiveError::corrupt(&self.path, e))
    }
}

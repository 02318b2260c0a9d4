//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for a vault that is a plain directory on disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::storage::{
    DocumentStore, Listing, ResourcePaths, StorageError, StorageErrorKind, join_path,
};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Characters escaped in the path part of `file://` URLs.
const PATH_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Filesystem vault.
///
/// Paths passed to the [`DocumentStore`] methods are relative to the vault
/// root; paths that try to leave the root are rejected.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use l5r_storage::{DocumentStore, FsStorage};
///
/// let storage = FsStorage::new(PathBuf::from("vault"));
/// let notes = storage.markdown_documents()?;
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Vault root directory.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault-relative path to a path on disk.
    ///
    /// Rejects parent directory components (`..`) and absolute paths to keep
    /// every access inside the vault.
    fn full_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(relative)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(relative))
    }

    fn io_error(err: std::io::Error, path: &str) -> StorageError {
        StorageError::io(err, path).with_backend(BACKEND)
    }

    /// Scan a directory recursively and collect markdown notes.
    fn scan_directory(dir_path: &Path, rel_prefix: &str, notes: &mut Vec<String>) {
        let entries = match fs::read_dir(dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir_path.display(), error = %e, "Failed to scan directory");
                return;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

            // Skip hidden entries, including the host's own config directory
            if name.starts_with('.') {
                continue;
            }

            if is_dir {
                let rel_dir = join_path(rel_prefix, &name);
                Self::scan_directory(&entry.path(), &rel_dir, notes);
            } else if Path::new(&name)
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("md"))
            {
                notes.push(join_path(rel_prefix, &name));
            }
        }
    }
}

impl DocumentStore for FsStorage {
    fn markdown_documents(&self) -> Result<Vec<String>, StorageError> {
        if !self.root.is_dir() {
            return Err(StorageError::not_found(&self.root).with_backend(BACKEND));
        }

        let mut notes = Vec::new();
        Self::scan_directory(&self.root, "", &mut notes);
        notes.sort();
        Ok(notes)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.full_path(path)?;
        fs::read_to_string(&full_path).map_err(|e| Self::io_error(e, path))
    }

    fn modify(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let full_path = self.full_path(path)?;
        fs::write(&full_path, content).map_err(|e| Self::io_error(e, path))
    }

    fn list(&self, folder: &str) -> Result<Listing, StorageError> {
        let full_path = self.full_path(folder)?;
        let entries = fs::read_dir(&full_path).map_err(|e| Self::io_error(e, folder))?;

        let mut listing = Listing::default();
        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            let child = join_path(folder, &name);
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                listing.folders.push(child);
            } else {
                listing.files.push(child);
            }
        }
        listing.files.sort();
        listing.folders.sort();
        Ok(listing)
    }

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.full_path(path)?;
        fs::read(&full_path).map_err(|e| Self::io_error(e, path))
    }

    fn write_binary(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.full_path(path)?;
        fs::write(&full_path, data).map_err(|e| Self::io_error(e, path))
    }

    fn create_folder(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.full_path(path)?;
        fs::create_dir_all(&full_path).map_err(|e| Self::io_error(e, path))
    }

    fn exists(&self, path: &str) -> bool {
        self.full_path(path).is_ok_and(|p| p.exists())
    }
}

impl ResourcePaths for FsStorage {
    fn resource_path(&self, path: &str) -> Option<String> {
        let full_path = self.full_path(path).ok()?;
        let absolute = std::path::absolute(&full_path).unwrap_or(full_path);
        let normalized = absolute.to_string_lossy().replace('\\', "/");
        let encoded = utf8_percent_encode(&normalized, PATH_SET);
        if normalized.starts_with('/') {
            Some(format!("file://{encoded}"))
        } else {
            Some(format!("file:///{encoded}"))
        }
    }
}

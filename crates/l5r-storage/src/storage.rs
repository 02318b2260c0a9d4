//! Storage traits and error types.
//!
//! # Path Convention
//!
//! Every path parameter is **vault-relative** and uses `/` as separator:
//! - `"Rules.md"` - note at the vault root
//! - `"Clans/Crab.md"` - nested note
//! - `"L5R_Icons"` - folder
//!
//! Implementations map these to their internal layout.

use std::path::PathBuf;

/// Entries of a folder, as vault-relative paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// Files directly inside the folder.
    pub files: Vec<String>,
    /// Sub-folders directly inside the folder.
    pub folders: Vec<String>,
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Resource already exists (for create operations).
    AlreadyExists,
    /// Invalid path (escapes the vault, absolute, ...).
    InvalidPath,
    /// Content is not valid UTF-8 text.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (not found, invalid path).
    #[default]
    Permanent,
    /// Retrying the same call may succeed.
    Temporary,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        let status = match err.kind() {
            std::io::ErrorKind::Interrupted | std::io::ErrorKind::TimedOut => {
                ErrorStatus::Temporary
            }
            _ => ErrorStatus::Permanent,
        };
        Self::new(kind)
            .with_status(status)
            .with_path(path)
            .with_source(err)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: notes/a.md)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Host storage capability used by the rewrite engine and the asset copier.
pub trait DocumentStore {
    /// All markdown notes in the vault, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the vault cannot be enumerated.
    fn markdown_documents(&self) -> Result<Vec<String>, StorageError>;

    /// Read a note as text.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Replace the full text of a note.
    fn modify(&self, path: &str, content: &str) -> Result<(), StorageError>;

    /// List the direct entries of a folder.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageErrorKind::NotFound`] error if the folder doesn't exist.
    fn list(&self, folder: &str) -> Result<Listing, StorageError>;

    /// Read a file as bytes.
    fn read_binary(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a file as bytes.
    fn write_binary(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Create a folder (and missing parents).
    fn create_folder(&self, path: &str) -> Result<(), StorageError>;

    /// Check whether a file or folder exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;
}

/// Host lookup from a vault-relative path to a URL a renderer can load.
pub trait ResourcePaths {
    /// Resolve a vault-relative path.
    ///
    /// Returns `None` when the path cannot be addressed (e.g. it escapes the vault).
    fn resource_path(&self, path: &str) -> Option<String>;
}

/// Join a folder and an entry name into a vault-relative path.
pub(crate) fn join_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        name.to_owned()
    } else {
        format!("{folder}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_storage_error_new() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.status, ErrorStatus::Permanent);
        assert!(err.path.is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_storage_error_io_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::io(io_err, "Clans/Crab.md");

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("Clans/Crab.md")));
    }

    #[test]
    fn test_storage_error_io_interrupted_is_temporary() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Interrupted, "interrupted");
        let err = StorageError::io(io_err, "a.md");

        assert_eq!(err.kind, StorageErrorKind::Other);
        assert_eq!(err.status, ErrorStatus::Temporary);
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("notes/a.md")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: notes/a.md)"
        );
    }

    #[test]
    fn test_storage_error_display_simple() {
        let err = StorageError::new(StorageErrorKind::InvalidPath);

        assert_eq!(err.to_string(), "Invalid path");
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("a/b", "c.svg"), "a/b/c.svg");
        assert_eq!(join_path("a/", "c.svg"), "a/c.svg");
        assert_eq!(join_path("", "c.svg"), "c.svg");
    }
}

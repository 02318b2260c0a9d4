//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::RwLock;

use crate::storage::{DocumentStore, Listing, ResourcePaths, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// In-memory vault for testing.
///
/// Use the builder methods to configure the mock with test data. Reads and
/// writes can be made to fail per path, and every successful write is
/// recorded so tests can assert that unchanged notes are never rewritten.
///
/// # Example
///
/// ```ignore
/// use l5r_storage::{DocumentStore, MockStorage};
///
/// let storage = MockStorage::new()
///     .with_document("Rules.md", "Spend 2 (op)")
///     .with_failing_read("Broken.md");
///
/// let text = storage.read("Rules.md").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    folders: RwLock<BTreeSet<String>>,
    failing_reads: RwLock<HashSet<String>>,
    failing_writes: RwLock<HashSet<String>>,
    writes: RwLock<Vec<String>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file; its parent folders are created.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_document(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.with_binary(path, content.into().into_bytes())
    }

    /// Add a binary file; its parent folders are created.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_binary(self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.files.write().unwrap().insert(path, data.into());
        self
    }

    /// Add an empty folder (and its parents).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_folder(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.folders.write().unwrap().insert(path);
        self
    }

    /// Make every read of `path` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_read(self, path: impl Into<String>) -> Self {
        self.failing_reads.write().unwrap().insert(path.into());
        self
    }

    /// Make every write of `path` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_write(self, path: impl Into<String>) -> Self {
        self.failing_writes.write().unwrap().insert(path.into());
        self
    }

    /// Current text of a file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn content(&self, path: &str) -> Option<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    /// Paths written so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes.read().unwrap().clone()
    }

    fn add_parents(&self, path: &str) {
        let mut folders = self.folders.write().unwrap();
        let mut parent = parent_of(path);
        while !parent.is_empty() {
            folders.insert(parent.to_owned());
            parent = parent_of(parent);
        }
    }

    fn check_read(&self, path: &str) -> Result<(), StorageError> {
        if self.failing_reads.read().unwrap().contains(path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn store(&self, path: &str, data: Vec<u8>) -> Result<(), StorageError> {
        if self.failing_writes.read().unwrap().contains(path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        self.add_parents(path);
        self.files.write().unwrap().insert(path.to_owned(), data);
        self.writes.write().unwrap().push(path.to_owned());
        Ok(())
    }
}

impl DocumentStore for MockStorage {
    fn markdown_documents(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|path| path.ends_with(".md"))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let data = self.read_binary(path)?;
        String::from_utf8(data).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidData)
                .with_path(path)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }

    fn modify(&self, path: &str, content: &str) -> Result<(), StorageError> {
        if !self.files.read().unwrap().contains_key(path) {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }
        self.store(path, content.as_bytes().to_vec())
    }

    fn list(&self, folder: &str) -> Result<Listing, StorageError> {
        let folder = folder.trim_end_matches('/');
        if !folder.is_empty() && !self.folders.read().unwrap().contains(folder) {
            return Err(StorageError::not_found(folder).with_backend(BACKEND));
        }

        let files = self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|path| parent_of(path) == folder)
            .cloned()
            .collect();
        let folders = self
            .folders
            .read()
            .unwrap()
            .iter()
            .filter(|path| parent_of(path) == folder)
            .cloned()
            .collect();
        Ok(Listing { files, folders })
    }

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.check_read(path)?;
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn write_binary(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store(path, data.to_vec())
    }

    fn create_folder(&self, path: &str) -> Result<(), StorageError> {
        self.add_parents(path);
        self.folders.write().unwrap().insert(path.to_owned());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
            || self.folders.read().unwrap().contains(path)
    }
}

impl ResourcePaths for MockStorage {
    fn resource_path(&self, path: &str) -> Option<String> {
        if path.split('/').any(|segment| segment == "..") {
            return None;
        }
        Some(format!("app://mock/{path}"))
    }
}

//! Vault storage abstraction for L5R symbols.
//!
//! The add-on never touches the filesystem directly. Everything it needs from
//! the host goes through two capabilities:
//!
//! - [`DocumentStore`] to enumerate, read and write notes and binary assets
//! - [`ResourcePaths`] to turn a vault-relative path into a loadable URL
//!
//! # Architecture
//!
//! The crate provides:
//! - [`FsStorage`] for a vault that is a plain directory on disk
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use l5r_storage::{DocumentStore, FsStorage};
//!
//! let storage = FsStorage::new(PathBuf::from("vault"));
//! for path in storage.markdown_documents()? {
//!     let text = storage.read(&path)?;
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{
    DocumentStore, ErrorStatus, Listing, ResourcePaths, StorageError, StorageErrorKind,
};

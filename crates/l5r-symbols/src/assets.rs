//! Copying the bundled icon set into the vault.
//!
//! Icons embedded with `![[...]]` must live inside the vault to be published,
//! so the bundled assets are copied into a regular vault folder.

use l5r_config::PLUGIN_DIR;
use l5r_storage::{DocumentStore, StorageError};

/// Vault folder the bundled icons are copied to.
pub const PUBLISH_FOLDER: &str = "L5R_Icons";

/// Folder holding the bundled icons, relative to the vault root.
#[must_use]
pub fn bundled_assets_folder() -> String {
    format!("{PLUGIN_DIR}/assets")
}

/// Error aborting an asset copy before any file was copied.
#[derive(Debug, thiserror::Error)]
pub enum AssetCopyError {
    /// The bundled assets folder could not be listed.
    #[error("no bundled assets found in {folder}")]
    SourceMissing {
        folder: String,
        #[source]
        source: StorageError,
    },
    /// The target folder could not be created.
    #[error("failed to create {folder}")]
    CreateTarget {
        folder: String,
        #[source]
        source: StorageError,
    },
}

/// Result of an asset copy.
#[derive(Debug, Default)]
pub struct CopyReport {
    /// Vault paths that were written.
    pub copied: Vec<String>,
    /// Files that could not be copied.
    pub failed: Vec<(String, StorageError)>,
}

impl CopyReport {
    /// Number of copied icons.
    #[must_use]
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }
}

fn is_svg(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("svg"))
}

fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Copy every `.svg` directly inside `source` into `target`.
///
/// The target folder is created when missing and existing files are
/// overwritten. A file that fails to copy is logged and skipped.
///
/// # Errors
///
/// Returns an error if the target cannot be created or the source cannot be
/// listed.
pub fn copy_bundled_assets<S: DocumentStore + ?Sized>(
    store: &S,
    source: &str,
    target: &str,
) -> Result<CopyReport, AssetCopyError> {
    if !store.exists(target) {
        store
            .create_folder(target)
            .map_err(|source| AssetCopyError::CreateTarget {
                folder: target.to_owned(),
                source,
            })?;
    }

    let listing = store
        .list(source)
        .map_err(|err| AssetCopyError::SourceMissing {
            folder: source.to_owned(),
            source: err,
        })?;

    let mut report = CopyReport::default();
    for file in listing.files.iter().filter(|f| is_svg(f)) {
        let dest = format!("{target}/{}", file_name(file));
        let result = store
            .read_binary(file)
            .and_then(|data| store.write_binary(&dest, &data));
        match result {
            Ok(()) => report.copied.push(dest),
            Err(err) => {
                tracing::error!(file = %file, error = %err, "Failed to copy icon");
                report.failed.push((file.clone(), err));
            }
        }
    }

    tracing::info!(
        copied = report.copied_count(),
        failed = report.failed.len(),
        target,
        "Copied bundled icons"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use l5r_storage::MockStorage;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = ".obsidian/plugins/l5r-symbols-replacer/assets";

    #[test]
    fn test_bundled_assets_folder() {
        assert_eq!(bundled_assets_folder(), SOURCE);
    }

    #[test]
    fn test_copies_only_svg_files() {
        let storage = MockStorage::new()
            .with_binary(format!("{SOURCE}/fire.svg"), b"<svg>fire</svg>".to_vec())
            .with_binary(format!("{SOURCE}/AIR.SVG"), b"<svg>air</svg>".to_vec())
            .with_binary(format!("{SOURCE}/readme.txt"), b"hi".to_vec())
            .with_binary(format!("{SOURCE}/nested/op.svg"), b"<svg/>".to_vec());

        let report = copy_bundled_assets(&storage, SOURCE, PUBLISH_FOLDER).unwrap();

        assert_eq!(report.copied, vec!["L5R_Icons/AIR.SVG", "L5R_Icons/fire.svg"]);
        assert!(storage.exists("L5R_Icons"));
        assert_eq!(
            storage.content("L5R_Icons/fire.svg").as_deref(),
            Some("<svg>fire</svg>")
        );
        assert!(!storage.exists("L5R_Icons/readme.txt"));
        assert!(!storage.exists("L5R_Icons/op.svg"));
    }

    #[test]
    fn test_overwrites_existing_files() {
        let storage = MockStorage::new()
            .with_binary(format!("{SOURCE}/fire.svg"), b"new".to_vec())
            .with_binary("L5R_Icons/fire.svg", b"old".to_vec());

        let report = copy_bundled_assets(&storage, SOURCE, PUBLISH_FOLDER).unwrap();

        assert_eq!(report.copied_count(), 1);
        assert_eq!(storage.content("L5R_Icons/fire.svg").as_deref(), Some("new"));
    }

    #[test]
    fn test_missing_source_aborts() {
        let storage = MockStorage::new();

        let err = copy_bundled_assets(&storage, SOURCE, PUBLISH_FOLDER).unwrap_err();

        assert!(matches!(err, AssetCopyError::SourceMissing { .. }));
        // Target is created before the source is listed.
        assert!(storage.exists("L5R_Icons"));
    }

    #[test]
    fn test_failed_file_is_skipped() {
        let storage = MockStorage::new()
            .with_binary(format!("{SOURCE}/air.svg"), b"a".to_vec())
            .with_binary(format!("{SOURCE}/fire.svg"), b"f".to_vec())
            .with_binary(format!("{SOURCE}/void.svg"), b"v".to_vec())
            .with_failing_read(format!("{SOURCE}/air.svg"))
            .with_failing_write("L5R_Icons/void.svg");

        let report = copy_bundled_assets(&storage, SOURCE, PUBLISH_FOLDER).unwrap();

        assert_eq!(report.copied, vec!["L5R_Icons/fire.svg"]);
        assert_eq!(report.failed.len(), 2);
    }

    #[test]
    fn test_empty_source_copies_nothing() {
        let storage = MockStorage::new().with_folder(SOURCE);

        let report = copy_bundled_assets(&storage, SOURCE, PUBLISH_FOLDER).unwrap();

        assert_eq!(report.copied_count(), 0);
        assert!(report.failed.is_empty());
    }
}

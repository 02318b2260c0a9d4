//! User-invocable commands.
//!
//! Each command runs one operation against the vault and reports the outcome
//! to the user through a [`Notifier`] with a short `L5R: ` notice.

use std::fmt;

use l5r_config::Settings;
use l5r_storage::DocumentStore;

use crate::assets::{self, AssetCopyError, CopyReport, PUBLISH_FOLDER};
use crate::rewrite::{BatchReport, Converter, DocumentRewriter, Reverter, RewriteError};

/// A user-invocable command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Copy the bundled icons into the publish folder.
    CopyIcons,
    /// Convert tokens to embeds in the active note.
    ConvertCurrent,
    /// Convert tokens to embeds in every note.
    ConvertVault,
    /// Revert embeds to tokens in the active note.
    RevertCurrent,
    /// Revert embeds to tokens in every note.
    RevertVault,
}

impl Command {
    /// Every command, in registration order.
    pub const ALL: [Self; 5] = [
        Self::CopyIcons,
        Self::ConvertCurrent,
        Self::ConvertVault,
        Self::RevertCurrent,
        Self::RevertVault,
    ];

    /// Stable command identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::CopyIcons => "l5r-copy-icons-to-public-folder",
            Self::ConvertCurrent => "l5r-convert-current-in-place",
            Self::ConvertVault => "l5r-convert-vault",
            Self::RevertCurrent => "l5r-revert-current",
            Self::RevertVault => "l5r-revert-vault",
        }
    }

    /// Human-readable command name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CopyIcons => "L5R: Copy bundled icons to folder (for Publish)",
            Self::ConvertCurrent => "L5R: Convert symbols to SVG (current note)",
            Self::ConvertVault => "L5R: Convert symbols to SVG (entire vault)",
            Self::RevertCurrent => "L5R: Reset SVG embeds back to symbols (current note)",
            Self::RevertVault => "L5R: Reset SVG embeds back to symbols (entire vault)",
        }
    }

    /// Look up a command by identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Whether the command operates on the active note.
    #[must_use]
    pub fn needs_active_document(self) -> bool {
        matches!(self, Self::ConvertCurrent | Self::RevertCurrent)
    }

    /// Whether the command can run given the active note, if any.
    #[must_use]
    pub fn is_available(self, active: Option<&str>) -> bool {
        !self.needs_active_document() || active.is_some()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Sink for short user-facing notices.
pub trait Notifier {
    /// Show a notice.
    fn notice(&self, message: &str);
}

/// What a command did.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Icons were copied.
    Copied(CopyReport),
    /// A single note was processed.
    Document { path: String, changed: bool },
    /// Every note was processed.
    Collection(BatchReport),
    /// Nothing ran because no base path is configured.
    MissingBasePath,
    /// Nothing ran because the command needs an active note.
    Unavailable,
}

/// Command error.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error(transparent)]
    Assets(#[from] AssetCopyError),
}

/// Runs commands against a store with the current settings.
pub struct CommandRunner<'a, S: DocumentStore + ?Sized> {
    settings: &'a Settings,
    store: &'a S,
    notifier: &'a dyn Notifier,
}

impl<'a, S: DocumentStore + ?Sized> CommandRunner<'a, S> {
    /// Create a runner.
    pub fn new(settings: &'a Settings, store: &'a S, notifier: &'a dyn Notifier) -> Self {
        Self {
            settings,
            store,
            notifier,
        }
    }

    /// Run `command`, with `active` as the current note.
    ///
    /// # Errors
    ///
    /// Returns an error if a single-note command cannot read or write its note,
    /// if the vault cannot be enumerated, or if the icon copy aborts.
    pub fn run(&self, command: Command, active: Option<&str>) -> Result<CommandOutcome, CommandError> {
        tracing::debug!(%command, ?active, "Running command");

        match (command, active) {
            (Command::CopyIcons, _) => self.copy_icons(),
            (Command::ConvertCurrent | Command::RevertCurrent, None) => {
                tracing::warn!(%command, "No active note");
                Ok(CommandOutcome::Unavailable)
            }
            (Command::ConvertCurrent, Some(path)) => self.convert_current(path),
            (Command::RevertCurrent, Some(path)) => self.revert_current(path),
            (Command::ConvertVault, _) => self.convert_vault(),
            (Command::RevertVault, _) => self.revert_vault(),
        }
    }

    fn copy_icons(&self) -> Result<CommandOutcome, CommandError> {
        let source = assets::bundled_assets_folder();
        match assets::copy_bundled_assets(self.store, &source, PUBLISH_FOLDER) {
            Ok(report) => {
                self.notifier.notice(&format!(
                    "L5R: Copied {} icons to {PUBLISH_FOLDER}",
                    report.copied_count()
                ));
                Ok(CommandOutcome::Copied(report))
            }
            Err(err @ AssetCopyError::SourceMissing { .. }) => {
                self.notifier.notice("L5R: No bundled assets found.");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Build the converter, telling the user when no base path is set.
    fn converter(&self, missing_notice: &str) -> Result<Option<Converter>, CommandError> {
        match Converter::from_settings(self.settings) {
            Ok(converter) => Ok(Some(converter)),
            Err(RewriteError::MissingBasePath) => {
                self.notifier.notice(missing_notice);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn convert_current(&self, path: &str) -> Result<CommandOutcome, CommandError> {
        let Some(converter) = self.converter("L5R: Set Base URL (e.g., vault:/L5R_Icons)")? else {
            return Ok(CommandOutcome::MissingBasePath);
        };
        let changed = DocumentRewriter::new(self.store)
            .convert_document(path, &converter)
            .map_err(RewriteError::from)?;
        self.notifier.notice("L5R: Converted current note.");
        Ok(CommandOutcome::Document {
            path: path.to_owned(),
            changed,
        })
    }

    fn revert_current(&self, path: &str) -> Result<CommandOutcome, CommandError> {
        let reverter = Reverter::from_settings(self.settings)?;
        let changed = DocumentRewriter::new(self.store)
            .revert_document(path, &reverter)
            .map_err(RewriteError::from)?;
        self.notifier.notice("L5R: Reverted current note.");
        Ok(CommandOutcome::Document {
            path: path.to_owned(),
            changed,
        })
    }

    fn convert_vault(&self) -> Result<CommandOutcome, CommandError> {
        let Some(converter) = self.converter("L5R: Set Base URL first")? else {
            return Ok(CommandOutcome::MissingBasePath);
        };
        let report = DocumentRewriter::new(self.store)
            .convert_collection(&converter)
            .map_err(RewriteError::from)?;
        self.notifier.notice(&format!(
            "L5R: Converted vault notes: {} changed.",
            report.changed_count()
        ));
        Ok(CommandOutcome::Collection(report))
    }

    fn revert_vault(&self) -> Result<CommandOutcome, CommandError> {
        let reverter = Reverter::from_settings(self.settings)?;
        let report = DocumentRewriter::new(self.store)
            .revert_collection(&reverter)
            .map_err(RewriteError::from)?;
        self.notifier.notice(&format!(
            "L5R: Reverted vault notes: {} changed.",
            report.changed_count()
        ));
        Ok(CommandOutcome::Collection(report))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use l5r_storage::MockStorage;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Notifier for Recorder {
        fn notice(&self, message: &str) {
            self.0.borrow_mut().push(message.to_owned());
        }
    }

    impl Recorder {
        fn notices(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    fn no_base() -> Settings {
        Settings {
            base_url: String::new(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_ids_unique_and_lookup() {
        for command in Command::ALL {
            assert_eq!(Command::from_id(command.id()), Some(command));
            assert!(command.name().starts_with("L5R: "));
        }
        assert_eq!(Command::from_id("nope"), None);
    }

    #[test]
    fn test_availability() {
        assert!(!Command::ConvertCurrent.is_available(None));
        assert!(Command::ConvertCurrent.is_available(Some("a.md")));
        assert!(Command::ConvertVault.is_available(None));
        assert!(Command::CopyIcons.is_available(None));
    }

    #[test]
    fn test_convert_current_note() {
        let settings = Settings::default();
        let storage = MockStorage::new().with_document("a.md", "(op)");
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        let outcome = runner.run(Command::ConvertCurrent, Some("a.md")).unwrap();

        assert!(matches!(outcome, CommandOutcome::Document { changed: true, .. }));
        assert_eq!(notifier.notices(), vec!["L5R: Converted current note."]);
        assert_eq!(
            storage.content("a.md").as_deref(),
            Some(r"![[L5R_Icons/op.svg\|18]]")
        );
    }

    #[test]
    fn test_convert_current_without_active_note() {
        let settings = Settings::default();
        let storage = MockStorage::new();
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        let outcome = runner.run(Command::ConvertCurrent, None).unwrap();

        assert!(matches!(outcome, CommandOutcome::Unavailable));
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_convert_without_base_path_notifies() {
        let settings = no_base();
        let storage = MockStorage::new().with_document("a.md", "(op)");
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        runner.run(Command::ConvertCurrent, Some("a.md")).unwrap();
        runner.run(Command::ConvertVault, None).unwrap();

        assert_eq!(
            notifier.notices(),
            vec![
                "L5R: Set Base URL (e.g., vault:/L5R_Icons)",
                "L5R: Set Base URL first"
            ]
        );
        assert!(storage.writes().is_empty());
    }

    #[test]
    fn test_vault_round_trip_notices() {
        let settings = Settings::default();
        let storage = MockStorage::new()
            .with_document("a.md", "(fire)")
            .with_document("b.md", "(air)")
            .with_document("c.md", "plain");
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        runner.run(Command::ConvertVault, None).unwrap();
        runner.run(Command::RevertVault, None).unwrap();

        assert_eq!(
            notifier.notices(),
            vec![
                "L5R: Converted vault notes: 2 changed.",
                "L5R: Reverted vault notes: 2 changed."
            ]
        );
        assert_eq!(storage.content("a.md").as_deref(), Some("(fire)"));
    }

    #[test]
    fn test_revert_current_with_empty_base_uses_generic() {
        let settings = no_base();
        let storage = MockStorage::new().with_document("a.md", r"![[Old/op.svg\|18]]");
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        runner.run(Command::RevertCurrent, Some("a.md")).unwrap();

        assert_eq!(storage.content("a.md").as_deref(), Some("(op)"));
        assert_eq!(notifier.notices(), vec!["L5R: Reverted current note."]);
    }

    #[test]
    fn test_current_note_read_failure_is_error() {
        let settings = Settings::default();
        let storage = MockStorage::new();
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        let result = runner.run(Command::RevertCurrent, Some("missing.md"));

        assert!(matches!(result, Err(CommandError::Rewrite(RewriteError::Storage(_)))));
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_copy_icons_notices() {
        let settings = Settings::default();
        let source = assets::bundled_assets_folder();
        let storage = MockStorage::new()
            .with_binary(format!("{source}/fire.svg"), b"f".to_vec())
            .with_binary(format!("{source}/air.svg"), b"a".to_vec());
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        runner.run(Command::CopyIcons, None).unwrap();

        assert_eq!(notifier.notices(), vec!["L5R: Copied 2 icons to L5R_Icons"]);
    }

    #[test]
    fn test_copy_icons_without_assets() {
        let settings = Settings::default();
        let storage = MockStorage::new();
        let notifier = Recorder::default();
        let runner = CommandRunner::new(&settings, &storage, &notifier);

        assert!(runner.run(Command::CopyIcons, None).is_err());
        assert_eq!(notifier.notices(), vec!["L5R: No bundled assets found."]);
    }
}

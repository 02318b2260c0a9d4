//! CLI command implementations.

mod render;
mod rewrite;
mod settings;

use std::path::{Path, PathBuf};

use l5r_config::{Settings, SettingsOverrides, SettingsStore, resolve_vault_root};
use l5r_storage::FsStorage;
use l5r_symbols::{Command, CommandOutcome, CommandRunner};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use render::RenderArgs;
pub(crate) use rewrite::RewriteArgs;
pub(crate) use settings::SettingsCommand;

/// An opened vault: storage plus the effective settings.
pub(crate) struct Vault {
    pub(crate) storage: FsStorage,
    pub(crate) settings: Settings,
}

impl Vault {
    /// Open the vault at `path`, or the one around the working directory.
    pub(crate) fn open(path: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self, CliError> {
        let root = resolve_vault_root(path)?;
        tracing::info!(root = %root.display(), "Using vault");

        let mut settings = SettingsStore::for_vault(&root)?.settings().clone();
        settings.apply_overrides(overrides);

        Ok(Self {
            storage: FsStorage::new(root),
            settings,
        })
    }

    /// Run one add-on command against this vault.
    pub(crate) fn run(
        &self,
        command: Command,
        active: Option<&str>,
        output: &Output,
    ) -> Result<CommandOutcome, CliError> {
        let runner = CommandRunner::new(&self.settings, &self.storage, output);
        match runner.run(command, active)? {
            CommandOutcome::MissingBasePath => Err(CliError::MissingBasePath),
            CommandOutcome::Unavailable => Err(CliError::Validation(format!(
                "{} needs a note",
                command.name()
            ))),
            outcome => Ok(outcome),
        }
    }

    /// Map a note argument to a vault-relative path.
    ///
    /// Accepts a path relative to the vault root, or a path on disk inside
    /// the vault (absolute or relative to the working directory).
    pub(crate) fn note_path(&self, note: &Path) -> Result<String, CliError> {
        let on_disk: Option<PathBuf> = if note.is_absolute() {
            Some(note.to_path_buf())
        } else {
            std::env::current_dir().ok().map(|cwd| cwd.join(note))
        };

        let relative = on_disk
            .filter(|p| p.is_file())
            .and_then(|p| {
                let root = self.storage.root().canonicalize().ok()?;
                let file = p.canonicalize().ok()?;
                file.strip_prefix(root).ok().map(Path::to_path_buf)
            })
            .unwrap_or_else(|| note.to_path_buf());

        if relative.is_absolute() {
            return Err(CliError::Validation(format!(
                "{} is outside the vault",
                note.display()
            )));
        }

        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(components.join("/"))
    }
}

/// `l5r copy-icons`.
pub(crate) fn copy_icons(vault: Option<&Path>, output: &Output) -> Result<(), CliError> {
    let vault = Vault::open(vault, &SettingsOverrides::default())?;
    if let CommandOutcome::Copied(report) = vault.run(Command::CopyIcons, None, output)? {
        for (file, err) in &report.failed {
            output.warning(&format!("  skipped {file}: {err}"));
        }
    }
    Ok(())
}

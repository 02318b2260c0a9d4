//! `l5r render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use l5r_config::SettingsOverrides;
use l5r_render::render_note;
use l5r_storage::DocumentStore;

use super::Vault;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Note to render (vault-relative or a path inside the vault).
    note: PathBuf,

    /// Emit a complete HTML page with the icon styles inlined.
    #[arg(long)]
    standalone: bool,

    /// Write to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Icon size in pixels (overrides settings).
    #[arg(long)]
    icon_size: Option<u32>,

    /// Base URL for icons (overrides settings).
    #[arg(long)]
    base_url: Option<String>,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self, vault: Option<&Path>, output: &Output) -> Result<(), CliError> {
        let overrides = SettingsOverrides {
            base_url: self.base_url,
            icon_size: self.icon_size,
            ..Default::default()
        };
        let vault = Vault::open(vault, &overrides)?;
        let path = vault.note_path(&self.note)?;

        let markdown = vault.storage.read(&path)?;
        let note = render_note(&markdown, &vault.settings, &vault.storage);
        tracing::info!(path = %path, symbols = note.symbols, "Rendered note");

        let html = if self.standalone {
            let title = path.rsplit('/').next().unwrap_or(&path);
            note.standalone_html(title.strip_suffix(".md").unwrap_or(title))
        } else {
            format!("{}\n", note.html())
        };

        match &self.output {
            Some(file) => {
                std::fs::write(file, html)?;
                output.success(&format!(
                    "Rendered {path} ({} symbols) to {}",
                    note.symbols,
                    file.display()
                ));
            }
            None => output.print(&html)?,
        }
        Ok(())
    }
}

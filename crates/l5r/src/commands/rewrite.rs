//! `l5r convert` and `l5r revert` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use l5r_config::SettingsOverrides;
use l5r_symbols::{BatchReport, Command, CommandOutcome};

use super::Vault;
use crate::error::CliError;
use crate::output::Output;

/// Arguments shared by the convert and revert commands.
#[derive(Args)]
pub(crate) struct RewriteArgs {
    /// Note to rewrite (vault-relative or a path inside the vault).
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    note: Option<PathBuf>,

    /// Rewrite every note in the vault.
    #[arg(long)]
    all: bool,

    /// Base URL for this run (overrides settings).
    #[arg(long)]
    base_url: Option<String>,

    /// Embed size in pixels for this run (overrides settings).
    #[arg(long)]
    embed_size: Option<u32>,
}

impl RewriteArgs {
    /// Execute the command.
    ///
    /// `single` is the single-note command; `--all` runs its vault-wide
    /// counterpart.
    pub(crate) fn execute(
        self,
        single: Command,
        vault: Option<&Path>,
        verbose: bool,
        output: &Output,
    ) -> Result<(), CliError> {
        let overrides = SettingsOverrides {
            base_url: self.base_url,
            embed_size: self.embed_size,
            ..Default::default()
        };
        let vault = Vault::open(vault, &overrides)?;

        let note = match (&self.note, self.all) {
            (Some(note), false) => Some(vault.note_path(note)?),
            _ => None,
        };
        let command = if note.is_some() {
            single
        } else {
            vault_wide(single)
        };

        match vault.run(command, note.as_deref(), output)? {
            CommandOutcome::Document { path, changed } if verbose => {
                output.detail(&format!(
                    "  {path}: {}",
                    if changed { "rewritten" } else { "no changes" }
                ));
            }
            CommandOutcome::Collection(report) => print_report(&report, verbose, output),
            _ => {}
        }
        Ok(())
    }
}

fn vault_wide(single: Command) -> Command {
    match single {
        Command::RevertCurrent | Command::RevertVault => Command::RevertVault,
        _ => Command::ConvertVault,
    }
}

fn print_report(report: &BatchReport, verbose: bool, output: &Output) {
    if verbose {
        for path in &report.changed {
            output.detail(&format!("  -> {path}"));
        }
        output.info(&format!("{} notes unchanged", report.unchanged));
    }
    for (path, err) in &report.failed {
        output.warning(&format!("  skipped {path}: {err}"));
    }
}

//! `l5r settings` command implementation.

use std::path::Path;

use clap::Subcommand;
use l5r_config::{SettingKey, SettingsStore, resolve_vault_root};

use crate::error::CliError;
use crate::output::Output;

/// Settings subcommands.
#[derive(Subcommand)]
pub(crate) enum SettingsCommand {
    /// Show the current settings.
    Show,
    /// Change one setting.
    Set {
        /// Setting name (baseUrl, iconSize, textFallback, embedSize).
        key: SettingKey,
        /// New value.
        value: String,
    },
    /// Restore one setting to its default.
    Reset {
        /// Setting name (baseUrl, iconSize, textFallback, embedSize).
        key: SettingKey,
    },
}

impl SettingsCommand {
    /// Execute the settings subcommand.
    pub(crate) fn execute(self, vault: Option<&Path>, output: &Output) -> Result<(), CliError> {
        let root = resolve_vault_root(vault)?;
        let mut store = SettingsStore::for_vault(&root)?;

        match self {
            Self::Show => {
                output.detail(&store.path().display().to_string());
                for key in SettingKey::ALL {
                    output.info(&format!("{} = {}", key.as_str(), store.get(key)));
                }
            }
            Self::Set { key, value } => {
                store.set(key, &value)?;
                output.success(&format!("{} = {}", key.as_str(), store.get(key)));
            }
            Self::Reset { key } => {
                store.reset(key)?;
                output.success(&format!("{} = {}", key.as_str(), store.get(key)));
            }
        }
        Ok(())
    }
}

//! Settings model for L5R symbols.
//!
//! The add-on keeps a single small [`Settings`] record. It is persisted by the
//! host as a JSON blob (`data.json` inside the add-on directory of the vault),
//! loaded once at startup and merged over [`Settings::default`], and rewritten
//! in full after every mutation through [`SettingsStore`].
//!
//! CLI flags can override individual values for one invocation via
//! [`SettingsOverrides`]; overrides are never persisted.

mod store;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

pub use store::{SettingKey, SettingsStore};

/// Host configuration directory that marks a vault root.
pub const HOST_CONFIG_DIR: &str = ".obsidian";

/// Add-on directory, relative to the vault root.
pub const PLUGIN_DIR: &str = ".obsidian/plugins/l5r-symbols-replacer";

/// Settings blob filename inside [`PLUGIN_DIR`].
pub const SETTINGS_FILENAME: &str = "data.json";

/// Default icon size in the app and in persisted embeds (px).
pub const DEFAULT_SIZE: u32 = 18;

/// Default base URL for icon assets.
pub const DEFAULT_BASE_URL: &str = "vault:/L5R_Icons";

/// Allowed range for the in-app icon size (px).
pub const ICON_SIZE_RANGE: std::ops::RangeInclusive<u32> = 12..=64;

/// Add-on settings.
///
/// Field names are serialized in camelCase to stay compatible with the blob
/// the host already stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Show `[token]` when no icon URL can be resolved.
    pub text_fallback: bool,
    /// Icon size used by the live renderer (px).
    #[serde(deserialize_with = "lenient_icon_size")]
    pub icon_size: u32,
    /// Folder the icons live in: `vault:/…`, a vault-relative path, or a URL.
    pub base_url: String,
    /// Size written into persisted embeds (px).
    #[serde(deserialize_with = "lenient_embed_size")]
    pub embed_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_fallback: true,
            icon_size: DEFAULT_SIZE,
            base_url: DEFAULT_BASE_URL.to_owned(),
            embed_size: DEFAULT_SIZE,
        }
    }
}

impl Settings {
    /// Parse a persisted blob, taking defaults for every missing key.
    ///
    /// An empty or whitespace-only blob yields the defaults.
    pub fn from_json(blob: &str) -> Result<Self, ConfigError> {
        if blob.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(blob)?)
    }

    /// Serialize the full record for persistence.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Base path used inside embeds.
    ///
    /// Strips a `vault:/` marker (case-insensitive) and one trailing slash, so
    /// `vault:/L5R_Icons/` becomes `L5R_Icons`.
    #[must_use]
    pub fn embed_base_path(&self) -> &str {
        let base = strip_vault_marker(&self.base_url).unwrap_or(&self.base_url);
        base.strip_suffix('/').unwrap_or(base)
    }

    /// Embed size, with `0` treated as unset.
    #[must_use]
    pub fn effective_embed_size(&self) -> u32 {
        if self.embed_size == 0 {
            DEFAULT_SIZE
        } else {
            self.embed_size
        }
    }

    /// Apply in-memory overrides.
    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(base_url) = &overrides.base_url {
            self.base_url = base_url.trim().to_owned();
        }
        if let Some(icon_size) = overrides.icon_size {
            self.icon_size = icon_size;
        }
        if let Some(embed_size) = overrides.embed_size {
            self.embed_size = embed_size;
        }
        if let Some(text_fallback) = overrides.text_fallback {
            self.text_fallback = text_fallback;
        }
    }
}

/// Read a size the host may have saved unchecked.
///
/// Any JSON value is accepted. Values that are not integers in `range` fall
/// back to [`DEFAULT_SIZE`].
fn lenient_size<'de, D>(
    deserializer: D,
    key: &str,
    range: &std::ops::RangeInclusive<u32>,
) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let size = value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| range.contains(n));

    Ok(size.unwrap_or_else(|| {
        tracing::warn!(key, value = %value, default = DEFAULT_SIZE, "Ignoring invalid size setting");
        DEFAULT_SIZE
    }))
}

fn lenient_icon_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_size(deserializer, "iconSize", &ICON_SIZE_RANGE)
}

fn lenient_embed_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_size(deserializer, "embedSize", &(0..=u32::MAX))
}

/// Strip the `vault:/` marker from a location, ignoring ASCII case.
///
/// Returns `None` when the marker is absent.
#[must_use]
pub fn strip_vault_marker(location: &str) -> Option<&str> {
    const MARKER: &str = "vault:/";
    let head = location.get(..MARKER.len())?;
    head.eq_ignore_ascii_case(MARKER)
        .then(|| &location[MARKER.len()..])
}

/// CLI settings that override persisted values for one invocation.
///
/// All fields are optional. Only non-None values override the loaded settings.
#[derive(Debug, Default)]
pub struct SettingsOverrides {
    /// Override the icon base URL.
    pub base_url: Option<String>,
    /// Override the in-app icon size.
    pub icon_size: Option<u32>,
    /// Override the embed size.
    pub embed_size: Option<u32>,
    /// Override the text fallback flag.
    pub text_fallback: Option<bool>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Settings file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Validation error.
    #[error("Settings error: {0}")]
    Validation(String),
}

/// Path of the settings blob for a vault.
#[must_use]
pub fn settings_path(vault_root: &Path) -> PathBuf {
    vault_root.join(PLUGIN_DIR).join(SETTINGS_FILENAME)
}

/// Search for the vault root from `start` upwards.
///
/// A vault root is the first directory that contains [`HOST_CONFIG_DIR`].
#[must_use]
pub fn discover_vault_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(HOST_CONFIG_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolve the vault root: explicit path, discovered root, or the working directory.
pub fn resolve_vault_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_dir() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(discover_vault_root(&cwd).unwrap_or(cwd))
}

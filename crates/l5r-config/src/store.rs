//! Load-mutate-persist ownership of the settings record.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{ConfigError, DEFAULT_SIZE, ICON_SIZE_RANGE, Settings, settings_path};

/// A settings field addressable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKey {
    /// `baseUrl`
    BaseUrl,
    /// `iconSize`
    IconSize,
    /// `textFallback`
    TextFallback,
    /// `embedSize`
    EmbedSize,
}

impl SettingKey {
    /// All keys in display order.
    pub const ALL: [Self; 4] = [
        Self::BaseUrl,
        Self::IconSize,
        Self::TextFallback,
        Self::EmbedSize,
    ];

    /// Name as stored in the blob.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "baseUrl",
            Self::IconSize => "iconSize",
            Self::TextFallback => "textFallback",
            Self::EmbedSize => "embedSize",
        }
    }
}

impl FromStr for SettingKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseUrl" | "base-url" | "base_url" => Ok(Self::BaseUrl),
            "iconSize" | "icon-size" | "icon_size" => Ok(Self::IconSize),
            "textFallback" | "text-fallback" | "text_fallback" => Ok(Self::TextFallback),
            "embedSize" | "embed-size" | "embed_size" => Ok(Self::EmbedSize),
            _ => Err(ConfigError::Validation(format!("unknown setting: {s}"))),
        }
    }
}

/// Owns the settings record and its persisted blob.
///
/// Every mutation writes the full record back to disk before returning.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings from `path`, merged over defaults.
    ///
    /// A missing file yields the defaults; nothing is written until the first
    /// mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(blob) => Settings::from_json(&blob)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings blob, using defaults");
                Settings::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, settings })
    }

    /// Load the settings blob of a vault.
    pub fn for_vault(vault_root: &Path) -> Result<Self, ConfigError> {
        Self::open(settings_path(vault_root))
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Path of the persisted blob.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the icon base URL (trimmed).
    pub fn set_base_url(&mut self, value: &str) -> Result<(), ConfigError> {
        let value = value.trim().to_owned();
        self.update(|s| s.base_url = value)
    }

    /// Set the in-app icon size.
    pub fn set_icon_size(&mut self, px: u32) -> Result<(), ConfigError> {
        if !ICON_SIZE_RANGE.contains(&px) {
            return Err(ConfigError::Validation(format!(
                "iconSize must be between {} and {} px",
                ICON_SIZE_RANGE.start(),
                ICON_SIZE_RANGE.end()
            )));
        }
        self.update(|s| s.icon_size = px)
    }

    /// Restore the default in-app icon size.
    pub fn reset_icon_size(&mut self) -> Result<(), ConfigError> {
        self.update(|s| s.icon_size = DEFAULT_SIZE)
    }

    /// Toggle the text fallback.
    pub fn set_text_fallback(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.update(|s| s.text_fallback = enabled)
    }

    /// Set the embed size.
    pub fn set_embed_size(&mut self, px: u32) -> Result<(), ConfigError> {
        self.update(|s| s.embed_size = px)
    }

    /// Set the embed size from free-form input; unparseable input stores the default.
    pub fn set_embed_size_str(&mut self, raw: &str) -> Result<(), ConfigError> {
        let px = raw.trim().parse().unwrap_or(DEFAULT_SIZE);
        self.set_embed_size(px)
    }

    /// Set a field from its textual form.
    pub fn set(&mut self, key: SettingKey, raw: &str) -> Result<(), ConfigError> {
        match key {
            SettingKey::BaseUrl => self.set_base_url(raw),
            SettingKey::IconSize => {
                let px = raw.trim().parse().map_err(|_| {
                    ConfigError::Validation(format!("iconSize must be a number, got {raw:?}"))
                })?;
                self.set_icon_size(px)
            }
            SettingKey::TextFallback => self.set_text_fallback(parse_flag(raw)?),
            SettingKey::EmbedSize => self.set_embed_size_str(raw),
        }
    }

    /// Restore a field to its default.
    pub fn reset(&mut self, key: SettingKey) -> Result<(), ConfigError> {
        let defaults = Settings::default();
        match key {
            SettingKey::BaseUrl => self.update(|s| s.base_url = defaults.base_url),
            SettingKey::IconSize => self.reset_icon_size(),
            SettingKey::TextFallback => self.set_text_fallback(defaults.text_fallback),
            SettingKey::EmbedSize => self.set_embed_size(defaults.embed_size),
        }
    }

    /// Textual value of a field.
    #[must_use]
    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::BaseUrl => self.settings.base_url.clone(),
            SettingKey::IconSize => self.settings.icon_size.to_string(),
            SettingKey::TextFallback => self.settings.text_fallback.to_string(),
            SettingKey::EmbedSize => self.settings.embed_size.to_string(),
        }
    }

    fn update(&mut self, mutate: impl FnOnce(&mut Settings)) -> Result<(), ConfigError> {
        mutate(&mut self.settings);
        self.save()
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.settings.to_json()?)?;
        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(ConfigError::Validation(format!(
            "textFallback must be true or false, got {other:?}"
        ))),
    }
}

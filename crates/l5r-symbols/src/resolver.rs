//! Icon URL resolution.
//!
//! Turns a token plus the configured base URL into something a renderer can
//! load. Resolution order for the candidate `base/file`:
//!
//! 1. `http(s)://`, `app://`, `file://` and `data:` locations pass through;
//! 2. `vault:/rel` goes through the host's resource lookup for `rel`;
//! 3. a bare relative path goes through the same lookup;
//! 4. anything else (absolute path, unknown scheme) passes through.

use l5r_config::{Settings, strip_vault_marker};
use l5r_storage::ResourcePaths;

use crate::vocab::Token;

/// Schemes that are already loadable as-is.
const PASS_THROUGH_SCHEMES: &[&str] = &["http://", "https://", "app://", "file://", "data:"];

/// Resolves icon URLs against the current settings and the host lookup.
pub struct AssetResolver<'a, R: ResourcePaths + ?Sized> {
    settings: &'a Settings,
    resources: &'a R,
}

impl<'a, R: ResourcePaths + ?Sized> AssetResolver<'a, R> {
    /// Create a resolver for the given settings.
    pub fn new(settings: &'a Settings, resources: &'a R) -> Self {
        Self {
            settings,
            resources,
        }
    }

    /// URL of the icon for `token`.
    ///
    /// Returns `None` when the host cannot address the location.
    #[must_use]
    pub fn resolve(&self, token: Token) -> Option<String> {
        let base = self.settings.base_url.as_str();
        let base = base.strip_suffix('/').unwrap_or(base);
        let candidate = if base.is_empty() {
            token.file_name().to_owned()
        } else {
            format!("{base}/{}", token.file_name())
        };
        self.resolve_location(&candidate)
    }

    /// URL of the icon for a token name; `None` for names outside the vocabulary.
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<String> {
        let token = name.parse().ok()?;
        self.resolve(token)
    }

    fn resolve_location(&self, location: &str) -> Option<String> {
        if location.is_empty() {
            return None;
        }
        if PASS_THROUGH_SCHEMES
            .iter()
            .any(|scheme| starts_with_ignore_case(location, scheme))
        {
            return Some(location.to_owned());
        }
        if let Some(relative) = strip_vault_marker(location) {
            return self.resources.resource_path(relative);
        }
        if !has_url_scheme(location) && !location.starts_with('/') {
            return self.resources.resource_path(location);
        }
        Some(location.to_owned())
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Whether `location` starts with `letters://`.
fn has_url_scheme(location: &str) -> bool {
    location.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic())
    })
}

/// Wrap a URL for use inside a CSS custom property.
///
/// Quotes are backslash-escaped so the value cannot break out of the
/// surrounding `url('…')`.
#[must_use]
pub fn css_url(url: &str) -> String {
    let escaped = url.replace('"', "\\\"").replace('\'', "\\'");
    format!("url('{escaped}')")
}

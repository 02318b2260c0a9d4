//! Token-to-icon transform over a [`TextRenderTarget`].

use l5r_config::Settings;
use l5r_storage::ResourcePaths;
use l5r_symbols::{AssetResolver, Token, css_url, pattern};

use crate::target::{NodeId, TextRenderTarget};
use crate::tree::Element;

/// Render error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The id no longer points into the tree.
    #[error("text node {0} no longer exists")]
    StaleNode(NodeId),
    /// The id points at something other than a text node.
    #[error("node {0} is not a text node")]
    NotText(NodeId),
}

/// One piece of a replaced text node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// Plain text kept between symbols.
    Text(String),
    /// An icon that replaces one `(token)`.
    Symbol(SymbolIcon),
}

/// A rendered symbol, ready to become a host element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolIcon {
    pub token: Token,
    /// Icon size (px).
    pub size: u32,
    /// Resolved icon URL.
    pub url: Option<String>,
    /// Show `[token]` when there is no URL.
    pub text_fallback: bool,
}

impl SymbolIcon {
    /// Build the icon element.
    ///
    /// The element carries the token in `data-l5r`, `aria-label` and
    /// `title`. Its text never contains `(token)`, so rendering twice is a
    /// no-op.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let name = self.token.as_str();
        let mut classes = String::from("l5r-symbol");
        let mut style = format!("--l5r-size: {}px;", self.size);
        let mut text = None;

        if let Some(url) = &self.url {
            classes.push_str(" l5r-has-icon");
            style.push_str(" --l5r-url: ");
            style.push_str(&css_url(url));
            style.push(';');
        } else if self.text_fallback {
            classes.push_str(" l5r-fallback");
            text = Some(format!("[{name}]"));
        }

        let mut span = Element::new("span")
            .with_attr("class", classes)
            .with_attr("data-l5r", name)
            .with_attr("aria-label", name)
            .with_attr("title", name)
            .with_attr("style", style);
        if let Some(text) = text {
            span.push_text(&text);
        }
        span
    }
}

/// Replaces `(token)` text with icon elements.
pub struct SymbolRenderer<'a, R: ResourcePaths + ?Sized> {
    settings: &'a Settings,
    resolver: AssetResolver<'a, R>,
}

impl<'a, R: ResourcePaths + ?Sized> SymbolRenderer<'a, R> {
    /// Create a renderer for the current settings.
    pub fn new(settings: &'a Settings, resources: &'a R) -> Self {
        Self {
            settings,
            resolver: AssetResolver::new(settings, resources),
        }
    }

    /// Icon for one token.
    #[must_use]
    pub fn icon(&self, token: Token) -> SymbolIcon {
        SymbolIcon {
            token,
            size: self.settings.icon_size,
            url: self.resolver.resolve(token),
            text_fallback: self.settings.text_fallback,
        }
    }

    /// Split `text` into text and symbol fragments.
    ///
    /// Returns `None` when the text holds no token. Empty text pieces between
    /// adjacent tokens are omitted.
    #[must_use]
    pub fn fragments(&self, text: &str) -> Option<Vec<Fragment>> {
        let mut fragments = Vec::new();
        let mut last = 0;

        for hit in pattern::scan(text) {
            if hit.position > last {
                fragments.push(Fragment::Text(text[last..hit.position].to_owned()));
            }
            fragments.push(Fragment::Symbol(self.icon(hit.token)));
            last = hit.end();
        }

        if fragments.is_empty() {
            return None;
        }
        if last < text.len() {
            fragments.push(Fragment::Text(text[last..].to_owned()));
        }
        Some(fragments)
    }

    /// Replace every token in `target`; returns the number of symbols.
    ///
    /// All replacements are computed before the tree is touched, then applied
    /// last to first so earlier node ids stay valid.
    pub fn process<T: TextRenderTarget + ?Sized>(&self, target: &mut T) -> Result<usize, RenderError> {
        let changes: Vec<(NodeId, Vec<Fragment>)> = target
            .text_nodes()
            .into_iter()
            .filter_map(|(id, text)| self.fragments(&text).map(|f| (id, f)))
            .collect();

        let symbols = changes
            .iter()
            .flat_map(|(_, fragments)| fragments)
            .filter(|f| matches!(f, Fragment::Symbol(_)))
            .count();

        for (id, fragments) in changes.into_iter().rev() {
            target.replace_text(&id, fragments)?;
        }

        tracing::debug!(symbols, "Rendered symbols");
        Ok(symbols)
    }

    /// Render hook: like [`process`](Self::process), but never fails.
    ///
    /// Errors are logged and the target is left as far as it got.
    pub fn post_process<T: TextRenderTarget + ?Sized>(&self, target: &mut T) -> usize {
        match self.process(target) {
            Ok(symbols) => symbols,
            Err(err) => {
                tracing::error!(error = %err, "Symbol rendering failed");
                0
            }
        }
    }
}

//! Live rendering of L5R symbol tokens.
//!
//! Rendered notes show `(token)` as an inline icon instead of the raw text.
//! The notes themselves are never modified; only the rendered tree is.
//!
//! # Architecture
//!
//! - [`TextRenderTarget`]: what the renderer needs from a tree (enumerate
//!   text nodes, replace one by fragments)
//! - [`SymbolRenderer`]: scans text nodes and swaps tokens for [`SymbolIcon`]s
//! - [`Element`] / [`Node`]: a small content tree implementing the target,
//!   built from markdown by [`parse_markdown`]
//!
//! Icon elements carry their size and URL as CSS custom properties;
//! [`STYLESHEET`] turns them into a masked inline box.
//!
//! # Example
//!
//! ```ignore
//! use l5r_config::Settings;
//! use l5r_render::render_note;
//!
//! let note = render_note("Spend 2 (op)", &Settings::default(), &storage);
//! println!("{}", note.html());
//! ```

mod markdown;
mod target;
mod transform;
mod tree;

use l5r_config::Settings;
use l5r_storage::ResourcePaths;

pub use markdown::parse_markdown;
pub use target::{NodeId, TextRenderTarget};
pub use transform::{Fragment, RenderError, SymbolIcon, SymbolRenderer};
pub use tree::{Element, Node, escape_html};

/// Styles for icon elements.
pub const STYLESHEET: &str = r".l5r-symbol {
  display: inline-block;
  width: var(--l5r-size, 18px);
  height: var(--l5r-size, 18px);
  vertical-align: text-bottom;
}

.l5r-symbol.l5r-has-icon {
  background-color: currentColor;
  -webkit-mask: var(--l5r-url) center / contain no-repeat;
  mask: var(--l5r-url) center / contain no-repeat;
}

.l5r-symbol.l5r-fallback {
  width: auto;
  height: auto;
  font-size: 0.85em;
  font-weight: 600;
}
";

/// A note rendered to a tree.
#[derive(Debug)]
pub struct RenderedNote {
    pub root: Element,
    /// Number of icons inserted.
    pub symbols: usize,
}

impl RenderedNote {
    /// Rendered body HTML.
    #[must_use]
    pub fn html(&self) -> String {
        self.root.to_html()
    }

    /// Self-contained HTML page with the icon styles inlined.
    #[must_use]
    pub fn standalone_html(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
             <style>\n{STYLESHEET}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            escape_html(title),
            self.html()
        )
    }
}

/// Parse `markdown` and render its tokens as icons.
///
/// Rendering failures are logged and leave the tree partially rendered.
pub fn render_note<R: ResourcePaths + ?Sized>(
    markdown: &str,
    settings: &Settings,
    resources: &R,
) -> RenderedNote {
    let mut root = parse_markdown(markdown);
    let symbols = SymbolRenderer::new(settings, resources).post_process(&mut root);
    RenderedNote { root, symbols }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l5r_storage::MockStorage;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_note() {
        let storage = MockStorage::new();
        let note = render_note("Spend 2 (op) to activate", &Settings::default(), &storage);

        assert_eq!(note.symbols, 1);
        assert_eq!(
            note.html(),
            "<div class=\"markdown-rendered\"><p>Spend 2 <span class=\"l5r-symbol l5r-has-icon\" \
             data-l5r=\"op\" aria-label=\"op\" title=\"op\" style=\"--l5r-size: 18px; \
             --l5r-url: url(&#x27;app://mock/L5R_Icons/op.svg&#x27;);\"></span> to activate</p></div>"
        );
    }

    #[test]
    fn test_render_note_skips_raw_html() {
        let storage = MockStorage::new();
        let note = render_note("<div>(op)</div>\n\n(su)", &Settings::default(), &storage);

        assert_eq!(note.symbols, 1);
        assert!(note.html().contains("<div>(op)</div>"));
    }

    #[test]
    fn test_render_table_cells() {
        let storage = MockStorage::new();
        let note = render_note(
            "| A | B |\n| --- | --- |\n| (crab) | (crane) |",
            &Settings::default(),
            &storage,
        );

        assert_eq!(note.symbols, 2);
    }

    #[test]
    fn test_standalone_html_includes_styles() {
        let storage = MockStorage::new();
        let note = render_note("(op)", &Settings::default(), &storage);

        let page = note.standalone_html("Rules & <Notes>");

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Rules &amp; &lt;Notes&gt;</title>"));
        assert!(page.contains(".l5r-symbol.l5r-has-icon"));
        assert!(page.contains("data-l5r=\"op\""));
    }
}

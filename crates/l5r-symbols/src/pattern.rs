//! Scanning and reverse-scanning matchers built from the vocabulary.
//!
//! Three matchers exist:
//!
//! - the forward matcher finds `(token)` in free-form text;
//! - the strict reverse matcher finds embeds generated under the *current*
//!   base path, `![[<base>/<token>.svg\|<size>]]`, also accepting an unescaped
//!   pipe or no size at all;
//! - the generic reverse matcher finds the same embed shape under any path.
//!
//! The forward and generic matchers depend only on the vocabulary and are
//! compiled once. The strict matcher embeds a user-editable base path, so it
//! is rebuilt whenever it is needed.

use std::sync::LazyLock;

use regex::Regex;

use crate::vocab::Token;

/// Regex alternation of every vocabulary token, as a capture group.
static TOKEN_GROUP: LazyLock<String> = LazyLock::new(|| {
    let names: Vec<String> = Token::ALL
        .iter()
        .map(|t| regex::escape(t.as_str()))
        .collect();
    format!("({})", names.join("|"))
});

static FORWARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\({}\)", *TOKEN_GROUP)).expect("invalid forward regex")
});

static GENERIC_REVERSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"!\[\[[^\]|]*/{}\.svg(?:\\?\|[0-9]+)?\]\]",
        *TOKEN_GROUP
    ))
    .expect("invalid generic reverse regex")
});

/// Matcher for `(token)`.
///
/// Capture group 1 is the token name.
#[must_use]
pub fn forward() -> &'static Regex {
    &FORWARD
}

/// Matcher for a generated embed under any folder.
///
/// Capture group 1 is the token name.
#[must_use]
pub fn generic_reverse() -> &'static Regex {
    &GENERIC_REVERSE
}

/// Build the matcher for embeds generated under `base_path`.
///
/// The base path is regex-escaped and one trailing `/` is ignored. Returns
/// `Ok(None)` when the base path is empty.
///
/// # Errors
///
/// Returns [`regex::Error`] if the compiled pattern exceeds the regex size
/// limit (only possible for pathologically long base paths).
pub fn strict_reverse(base_path: &str) -> Result<Option<Regex>, regex::Error> {
    let base_path = base_path.strip_suffix('/').unwrap_or(base_path);
    if base_path.is_empty() {
        return Ok(None);
    }

    let source = format!(
        r"!\[\[\s*{}/{}\.svg(?:\\?\|[0-9]+)?\s*\]\]",
        regex::escape(base_path),
        *TOKEN_GROUP
    );
    Regex::new(&source).map(Some)
}

/// One forward-matcher hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanMatch<'t> {
    /// Matched text, parentheses included.
    pub span: &'t str,
    /// Recognized token.
    pub token: Token,
    /// Byte offset of the match in the scanned text.
    pub position: usize,
}

impl ScanMatch<'_> {
    /// Byte offset just past the match.
    #[must_use]
    pub fn end(&self) -> usize {
        self.position + self.span.len()
    }
}

/// Scan text for tokens, left to right, without overlaps.
pub fn scan(text: &str) -> impl Iterator<Item = ScanMatch<'_>> {
    FORWARD.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let token = caps.get(1)?.as_str().parse().ok()?;
        Some(ScanMatch {
            span: whole.as_str(),
            token,
            position: whole.start(),
        })
    })
}

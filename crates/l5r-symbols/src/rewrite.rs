//! Forward and reverse rewriting of note text.
//!
//! Converting replaces every `(token)` with an embed of the token's asset,
//!
//! ```text
//! (fire)  ->  ![[L5R_Icons/fire.svg\|18]]
//! ```
//!
//! The pipe before the size is escaped so the embed stays intact inside a
//! table cell. Reverting turns such embeds back into `(token)`: first with
//! the matcher built from the current base path, and only if that changes
//! nothing, with the generic matcher that accepts any folder.
//!
//! [`DocumentRewriter`] applies both directions to notes in a
//! [`DocumentStore`], writing a note only when its text actually changed.

use std::borrow::Cow;

use l5r_config::Settings;
use l5r_storage::{DocumentStore, StorageError};
use regex::{Captures, Regex};

use crate::pattern;
use crate::vocab::Token;

/// Rewrite error.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// Converting needs a folder to point the embeds at.
    #[error("no base path configured for icon embeds")]
    MissingBasePath,
    /// The reverse matcher could not be compiled.
    #[error("invalid base path pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// Reading or writing a note failed.
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Which reverse matcher produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertPass {
    /// Embeds under the configured base path.
    Strict,
    /// Embeds under any folder.
    Generic,
}

/// Outcome of rewriting one text.
#[derive(Debug)]
pub struct Rewrite<'a> {
    /// Text before rewriting.
    pub original: &'a str,
    /// Text after rewriting.
    pub text: Cow<'a, str>,
    /// Number of replaced occurrences.
    pub replacements: usize,
    /// Reverse matcher that produced the change, if any.
    pub pass: Option<RevertPass>,
}

impl<'a> Rewrite<'a> {
    fn unchanged(original: &'a str) -> Self {
        Self {
            original,
            text: Cow::Borrowed(original),
            replacements: 0,
            pass: None,
        }
    }

    /// Whether the rewritten text differs from the original.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.text != self.original
    }

    /// Take the rewritten text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text.into_owned()
    }
}

/// Replace every match of `re` whose capture group 1 is a vocabulary token.
///
/// Matches whose capture is not a token are left untouched.
fn replace_tokens<'a>(
    re: &Regex,
    text: &'a str,
    emit: impl Fn(Token) -> String,
) -> (Cow<'a, str>, usize) {
    let mut count = 0;
    let replaced = re.replace_all(text, |caps: &Captures<'_>| {
        match caps[1].parse::<Token>() {
            Ok(token) => {
                count += 1;
                emit(token)
            }
            Err(_) => caps[0].to_owned(),
        }
    });
    (replaced, count)
}

/// Token-to-embed conversion for a fixed base path and size.
#[derive(Debug, Clone)]
pub struct Converter {
    base_path: String,
    embed_size: u32,
}

impl Converter {
    /// Create a converter.
    ///
    /// One trailing `/` of `base_path` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::MissingBasePath`] if the base path is empty.
    pub fn new(base_path: &str, embed_size: u32) -> Result<Self, RewriteError> {
        let base_path = base_path.strip_suffix('/').unwrap_or(base_path);
        if base_path.is_empty() {
            return Err(RewriteError::MissingBasePath);
        }
        Ok(Self {
            base_path: base_path.to_owned(),
            embed_size,
        })
    }

    /// Create a converter from the current settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, RewriteError> {
        Self::new(settings.embed_base_path(), settings.effective_embed_size())
    }

    /// Base path the embeds point at.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Embed markup for one token.
    #[must_use]
    pub fn embed(&self, token: Token) -> String {
        format!(
            "![[{}/{}\\|{}]]",
            self.base_path,
            token.file_name(),
            self.embed_size
        )
    }

    /// Replace every `(token)` in `text` with its embed.
    #[must_use]
    pub fn convert<'a>(&self, text: &'a str) -> Rewrite<'a> {
        let (replaced, count) = replace_tokens(pattern::forward(), text, |t| self.embed(t));
        Rewrite {
            original: text,
            text: replaced,
            replacements: count,
            pass: None,
        }
    }
}

/// Embed-to-token reversion.
#[derive(Debug, Clone)]
pub struct Reverter {
    strict: Option<Regex>,
}

impl Reverter {
    /// Create a reverter for embeds under `base_path`.
    ///
    /// With an empty base path only the generic matcher is used.
    pub fn new(base_path: &str) -> Result<Self, RewriteError> {
        Ok(Self {
            strict: pattern::strict_reverse(base_path)?,
        })
    }

    /// Create a reverter from the current settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, RewriteError> {
        Self::new(settings.embed_base_path())
    }

    /// Replace generated embeds in `text` with `(token)`.
    ///
    /// The strict pass runs first; the generic pass runs only when the strict
    /// pass left the text unchanged. The two are never combined on one text.
    #[must_use]
    pub fn revert<'a>(&self, text: &'a str) -> Rewrite<'a> {
        if let Some(strict) = &self.strict {
            let (replaced, count) = replace_tokens(strict, text, Token::marker);
            if replaced != text {
                return Rewrite {
                    original: text,
                    text: replaced,
                    replacements: count,
                    pass: Some(RevertPass::Strict),
                };
            }
        }

        let (replaced, count) = replace_tokens(pattern::generic_reverse(), text, Token::marker);
        if replaced == text {
            return Rewrite::unchanged(text);
        }
        Rewrite {
            original: text,
            text: replaced,
            replacements: count,
            pass: Some(RevertPass::Generic),
        }
    }
}

/// Result of rewriting every note in a store.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Notes that were rewritten.
    pub changed: Vec<String>,
    /// Notes left as they were.
    pub unchanged: usize,
    /// Notes skipped because reading or writing failed.
    pub failed: Vec<(String, StorageError)>,
}

impl BatchReport {
    /// Number of rewritten notes.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.changed.len()
    }
}

/// Applies conversions to notes in a [`DocumentStore`].
pub struct DocumentRewriter<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: DocumentStore + ?Sized> DocumentRewriter<'s, S> {
    /// Create a rewriter over `store`.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Convert tokens in one note. Returns whether the note was written.
    pub fn convert_document(&self, path: &str, converter: &Converter) -> Result<bool, StorageError> {
        self.apply(path, |text| converter.convert(text))
    }

    /// Revert embeds in one note. Returns whether the note was written.
    pub fn revert_document(&self, path: &str, reverter: &Reverter) -> Result<bool, StorageError> {
        self.apply(path, |text| reverter.revert(text))
    }

    /// Convert tokens in every note.
    ///
    /// # Errors
    ///
    /// Fails only if the notes cannot be enumerated; per-note failures are
    /// logged and reported in [`BatchReport::failed`].
    pub fn convert_collection(&self, converter: &Converter) -> Result<BatchReport, StorageError> {
        self.apply_collection("convert", |text| converter.convert(text))
    }

    /// Revert embeds in every note.
    ///
    /// # Errors
    ///
    /// Fails only if the notes cannot be enumerated; per-note failures are
    /// logged and reported in [`BatchReport::failed`].
    pub fn revert_collection(&self, reverter: &Reverter) -> Result<BatchReport, StorageError> {
        self.apply_collection("revert", |text| reverter.revert(text))
    }

    /// Read, rewrite and write back only if the text changed.
    fn apply<F>(&self, path: &str, rewrite: F) -> Result<bool, StorageError>
    where
        F: for<'a> Fn(&'a str) -> Rewrite<'a>,
    {
        let before = self.store.read(path)?;
        let result = rewrite(&before);
        if !result.changed() {
            tracing::debug!(path, "No changes");
            return Ok(false);
        }

        tracing::debug!(path, replacements = result.replacements, pass = ?result.pass, "Rewriting");
        self.store.modify(path, &result.text)?;
        Ok(true)
    }

    fn apply_collection<F>(&self, action: &str, rewrite: F) -> Result<BatchReport, StorageError>
    where
        F: for<'a> Fn(&'a str) -> Rewrite<'a>,
    {
        let mut report = BatchReport::default();

        for path in self.store.markdown_documents()? {
            match self.apply(&path, &rewrite) {
                Ok(true) => report.changed.push(path),
                Ok(false) => report.unchanged += 1,
                Err(err) => {
                    tracing::error!(path = %path, error = %err, "Failed to {action} note, skipping");
                    report.failed.push((path, err));
                }
            }
        }

        tracing::info!(
            action,
            changed = report.changed_count(),
            unchanged = report.unchanged,
            failed = report.failed.len(),
            "Finished rewriting notes"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l5r_storage::MockStorage;
    use pretty_assertions::assert_eq;

    fn converter() -> Converter {
        Converter::from_settings(&Settings::default()).unwrap()
    }

    fn reverter() -> Reverter {
        Reverter::from_settings(&Settings::default()).unwrap()
    }

    #[test]
    fn test_convert_fire_with_defaults() {
        let result = converter().convert("(fire)");

        assert_eq!(result.text, r"![[L5R_Icons/fire.svg\|18]]");
        assert_eq!(result.replacements, 1);
        assert!(result.changed());
    }

    #[test]
    fn test_convert_preserves_surrounding_text() {
        let result = converter().convert("Spend 2 (op) to gain (void).");

        assert_eq!(
            result.text,
            r"Spend 2 ![[L5R_Icons/op.svg\|18]] to gain ![[L5R_Icons/void.svg\|18]]."
        );
        assert_eq!(result.replacements, 2);
    }

    #[test]
    fn test_convert_leaves_unknown_tokens() {
        let result = converter().convert("(bogus) and (Fire)");

        assert_eq!(result.text, "(bogus) and (Fire)");
        assert!(!result.changed());
        assert!(matches!(result.text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_convert_uses_embed_size_and_strips_trailing_slash() {
        let conv = Converter::new("Icons/", 24).unwrap();

        assert_eq!(conv.base_path(), "Icons");
        assert_eq!(conv.convert("(kiho)").text, r"![[Icons/kiho.svg\|24]]");
    }

    #[test]
    fn test_convert_table_cell_stays_one_cell() {
        let result = converter().convert("| Cost | (op) |");

        assert_eq!(result.text, r"| Cost | ![[L5R_Icons/op.svg\|18]] |");
    }

    #[test]
    fn test_converter_requires_base_path() {
        let settings = Settings {
            base_url: "vault:/".to_owned(),
            ..Settings::default()
        };

        assert!(matches!(
            Converter::from_settings(&settings),
            Err(RewriteError::MissingBasePath)
        ));
        assert!(matches!(
            Converter::new("", 18),
            Err(RewriteError::MissingBasePath)
        ));
    }

    #[test]
    fn test_converter_zero_embed_size_falls_back() {
        let settings = Settings {
            embed_size: 0,
            ..Settings::default()
        };
        let conv = Converter::from_settings(&settings).unwrap();

        assert_eq!(conv.embed(Token::Air), r"![[L5R_Icons/air.svg\|18]]");
    }

    #[test]
    fn test_revert_strict_all_size_forms() {
        let text = r"a ![[L5R_Icons/fire.svg\|18]] b ![[L5R_Icons/air.svg|20]] c ![[L5R_Icons/op.svg]]";

        let result = reverter().revert(text);

        assert_eq!(result.text, "a (fire) b (air) c (op)");
        assert_eq!(result.pass, Some(RevertPass::Strict));
        assert_eq!(result.replacements, 3);
    }

    #[test]
    fn test_revert_unset_base_falls_back_to_generic() {
        let rev = Reverter::new("").unwrap();

        let result = rev.revert(r"![[L5R_Icons/fire.svg\|18]]");

        assert_eq!(result.text, "(fire)");
        assert_eq!(result.pass, Some(RevertPass::Generic));
    }

    #[test]
    fn test_revert_other_folder_falls_back_to_generic() {
        let result = reverter().revert(r"x ![[Old/Icons/lion.svg\|18]] y");

        assert_eq!(result.text, "x (lion) y");
        assert_eq!(result.pass, Some(RevertPass::Generic));
    }

    #[test]
    fn test_revert_mixed_folders_strict_wins() {
        let text = r"![[L5R_Icons/crane.svg\|18]] ![[Old/crab.svg\|18]]";

        let result = reverter().revert(text);

        assert_eq!(result.text, r"(crane) ![[Old/crab.svg\|18]]");
        assert_eq!(result.pass, Some(RevertPass::Strict));
    }

    #[test]
    fn test_revert_nothing_to_do() {
        let result = reverter().revert("plain (fire) text ![[image.png]]");

        assert!(!result.changed());
        assert_eq!(result.pass, None);
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn test_revert_unknown_asset_untouched() {
        let result = reverter().revert(r"![[L5R_Icons/bogus.svg\|18]]");

        assert!(!result.changed());
    }

    #[test]
    fn test_round_trip_every_token() {
        let conv = converter();
        let rev = reverter();

        for token in Token::ALL {
            let source = format!("before {} after", token.marker());
            let converted = conv.convert(&source).into_text();
            let reverted = rev.revert(&converted).into_text();
            assert_eq!(reverted, source);

            let again = conv.convert(&reverted).into_text();
            assert_eq!(again, converted);
        }
    }

    #[test]
    fn test_round_trip_with_escaped_base_path() {
        let conv = Converter::new("icons (v2)", 18).unwrap();
        let rev = Reverter::new("icons (v2)").unwrap();
        let source = "(fire)(water) | (shugenja)";

        let converted = conv.convert(source).into_text();
        let result = rev.revert(&converted);

        assert_eq!(result.text, source);
        assert_eq!(result.pass, Some(RevertPass::Strict));
    }

    #[test]
    fn test_convert_document_writes_only_when_changed() {
        let storage = MockStorage::new()
            .with_document("a.md", "Use (air)")
            .with_document("b.md", "Nothing here");
        let rewriter = DocumentRewriter::new(&storage);

        assert!(rewriter.convert_document("a.md", &converter()).unwrap());
        assert!(!rewriter.convert_document("b.md", &converter()).unwrap());

        assert_eq!(storage.writes(), vec!["a.md"]);
        assert_eq!(
            storage.content("a.md").as_deref(),
            Some(r"Use ![[L5R_Icons/air.svg\|18]]")
        );
    }

    #[test]
    fn test_convert_document_missing() {
        let storage = MockStorage::new();
        let rewriter = DocumentRewriter::new(&storage);

        assert!(rewriter.convert_document("a.md", &converter()).is_err());
    }

    #[test]
    fn test_convert_collection_counts_changed() {
        let storage = MockStorage::new()
            .with_document("a.md", "(op)")
            .with_document("b.md", "nothing")
            .with_document("c/d.md", "(su) (ex)")
            .with_binary("e.svg", b"(op)".to_vec());
        let rewriter = DocumentRewriter::new(&storage);

        let report = rewriter.convert_collection(&converter()).unwrap();

        assert_eq!(report.changed_count(), 2);
        assert_eq!(report.changed, vec!["a.md", "c/d.md"]);
        assert_eq!(report.unchanged, 1);
        assert!(report.failed.is_empty());
        assert_eq!(storage.writes(), vec!["a.md", "c/d.md"]);
        assert_eq!(storage.content("e.svg").as_deref(), Some("(op)"));
    }

    #[test]
    fn test_collection_continues_after_failures() {
        let storage = MockStorage::new()
            .with_document("a.md", "(op)")
            .with_document("b.md", "(op)")
            .with_document("c.md", "(op)")
            .with_failing_read("a.md")
            .with_failing_write("b.md");
        let rewriter = DocumentRewriter::new(&storage);

        let report = rewriter.convert_collection(&converter()).unwrap();

        assert_eq!(report.changed, vec!["c.md"]);
        let failed: Vec<_> = report.failed.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(failed, vec!["a.md", "b.md"]);
        assert_eq!(storage.content("b.md").as_deref(), Some("(op)"));
    }

    #[test]
    fn test_revert_collection_round_trip() {
        let storage = MockStorage::new()
            .with_document("a.md", "Spend (op) for (fire)")
            .with_document("b.md", "untouched");
        let rewriter = DocumentRewriter::new(&storage);

        rewriter.convert_collection(&converter()).unwrap();
        let report = rewriter.revert_collection(&reverter()).unwrap();

        assert_eq!(report.changed_count(), 1);
        assert_eq!(
            storage.content("a.md").as_deref(),
            Some("Spend (op) for (fire)")
        );
        assert_eq!(storage.writes(), vec!["a.md", "a.md"]);
    }
}

//! L5R symbol tokens and the note rewrite engine.
//!
//! Notes write game symbols as parenthesized tokens such as `(fire)` or
//! `(op)`. This crate knows the closed token vocabulary and everything that
//! acts on it without rendering:
//!
//! - [`Token`] and the [`pattern`] matchers that find tokens and generated
//!   embeds in text
//! - [`AssetResolver`] which maps a token to a loadable icon URL
//! - [`Converter`] / [`Reverter`] for rewriting `(token)` to
//!   `![[base/token.svg\|size]]` and back
//! - [`DocumentRewriter`] which applies them to notes in a
//!   [`DocumentStore`](l5r_storage::DocumentStore)
//! - [`CommandRunner`] for the user-invocable commands
//!
//! # Example
//!
//! ```ignore
//! use l5r_config::Settings;
//! use l5r_symbols::Converter;
//!
//! let converter = Converter::from_settings(&Settings::default())?;
//! let rewrite = converter.convert("Spend 2 (op)");
//! assert_eq!(rewrite.text, r"Spend 2 ![[L5R_Icons/op.svg\|18]]");
//! ```

mod assets;
mod commands;
pub mod pattern;
mod resolver;
mod rewrite;
mod vocab;

pub use assets::{
    AssetCopyError, CopyReport, PUBLISH_FOLDER, bundled_assets_folder, copy_bundled_assets,
};
pub use commands::{Command, CommandError, CommandOutcome, CommandRunner, Notifier};
pub use pattern::ScanMatch;
pub use resolver::{AssetResolver, css_url};
pub use rewrite::{
    BatchReport, Converter, DocumentRewriter, RevertPass, Reverter, Rewrite, RewriteError,
};
pub use vocab::{Token, UnknownToken, file_for};

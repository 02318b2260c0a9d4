//! L5R symbols CLI.
//!
//! Provides commands for:
//! - `copy-icons`: Copy the bundled icons into the vault for publishing
//! - `convert`: Rewrite `(token)` into icon embeds
//! - `revert`: Rewrite icon embeds back into `(token)`
//! - `render`: Render a note to HTML with inline icons
//! - `settings`: Show or change the persisted settings

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, RewriteArgs, SettingsCommand};
use l5r_symbols::Command;
use output::Output;

/// L5R symbols - icons for Legend of the Five Rings notes.
#[derive(Parser)]
#[command(name = "l5r", version, about)]
struct Cli {
    /// Vault root (default: discovered from the current directory).
    #[arg(long, global = true, env = "L5R_VAULT")]
    vault: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy bundled icons into the vault (for Publish).
    CopyIcons,
    /// Convert symbols to SVG embeds.
    Convert(RewriteArgs),
    /// Reset SVG embeds back to symbols.
    Revert(RewriteArgs),
    /// Render a note to HTML.
    Render(RenderArgs),
    /// Show or change settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let vault = cli.vault.as_deref();
    let result = match cli.command {
        Commands::CopyIcons => commands::copy_icons(vault, &output),
        Commands::Convert(args) => args.execute(Command::ConvertCurrent, vault, cli.verbose, &output),
        Commands::Revert(args) => args.execute(Command::RevertCurrent, vault, cli.verbose, &output),
        Commands::Render(args) => args.execute(vault, &output),
        Commands::Settings(cmd) => cmd.execute(vault, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

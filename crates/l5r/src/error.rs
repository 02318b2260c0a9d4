//! CLI error types.

use l5r_config::ConfigError;
use l5r_storage::StorageError;
use l5r_symbols::CommandError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Command(#[from] CommandError),

    #[error("base URL is not set (try `l5r settings set base-url vault:/L5R_Icons`)")]
    MissingBasePath,

    #[error("{0}")]
    Validation(String),
}

use std::path::PathBuf;

use dbsetup_db::extension::ExtensionError;

use crate::config::ConfigError;

/// Every way a provisioning run can fail. None of them is recovered from:
/// the first one aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Failed to enable extension '{name}': {source}")]
    Extension {
        name: String,
        #[source]
        source: ExtensionError,
    },

    #[error("Failed to read SQL file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Statement #{ordinal} (line {line}) failed: {source}\n{statement}")]
    Statement {
        ordinal: usize,
        line: usize,
        statement: String,
        #[source]
        source: sqlx::Error,
    },
}

//! Enabling PostgreSQL extensions.

use dbsetup_core::error::CoreError;
use dbsetup_core::identifier::{render_identifier, validate_identifier};

use crate::executor::StatementExecutor;

/// Extension every provisioned database needs.
pub const PGCRYPTO: &str = "pgcrypto";

#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    #[error(transparent)]
    InvalidName(#[from] CoreError),

    #[error("Database rejected the extension: {0}")]
    Database(#[from] sqlx::Error),
}

/// Build the idempotent `CREATE EXTENSION` statement for `name`.
pub fn create_extension_sql(name: &str) -> Result<String, CoreError> {
    let name = validate_identifier(name)?;
    Ok(format!(
        "CREATE EXTENSION IF NOT EXISTS {}",
        render_identifier(name)
    ))
}

/// Enable extension `name` unless it is already installed.
///
/// Succeeds on an already provisioned database; fails when the role lacks
/// the privilege to create the extension or the server does not ship it.
pub async fn ensure_extension<E>(executor: &mut E, name: &str) -> Result<(), ExtensionError>
where
    E: StatementExecutor,
{
    let sql = create_extension_sql(name)?;
    executor.execute_sql(&sql).await?;
    tracing::debug!(extension = name, "Extension available");
    Ok(())
}

//! Provisioning run.
//!
//! One linear pass: connect, enable the required extensions, load the SQL
//! script, execute its statements in file order, close the connection.
//! The first failure aborts the run; statements already executed stay
//! applied.

use std::path::Path;
use std::time::{Duration, Instant};

use dbsetup_core::batch::StatementBatch;
use dbsetup_core::split::Boundary;
use dbsetup_db::{ensure_extension, StatementExecutor};

use crate::config::ProvisionConfig;
use crate::error::ProvisionError;

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub extensions_enabled: usize,
    pub statements_executed: usize,
    /// Comment-only fragments that were not sent to the database.
    pub fragments_skipped: usize,
    /// Time from the first extension statement to the last script
    /// statement; connection setup is not included.
    pub elapsed: Duration,
}

/// Connect to the configured database and provision it.
pub async fn run(config: &ProvisionConfig) -> Result<ProvisionReport, ProvisionError> {
    let conn = dbsetup_db::connect(&config.database_url, config.tls)
        .await
        .map_err(ProvisionError::Connection)?;
    tracing::info!(tls = %config.tls, "Connected to database");

    provision_and_close(conn, config).await
}

/// Provision through `executor`, then close it whether provisioning
/// succeeded or failed. A failed close is logged and does not replace the
/// provisioning outcome.
pub async fn provision_and_close<E>(
    mut executor: E,
    config: &ProvisionConfig,
) -> Result<ProvisionReport, ProvisionError>
where
    E: StatementExecutor,
{
    let outcome = provision(&mut executor, config).await;

    if let Err(e) = executor.close().await {
        tracing::warn!(error = %e, "Failed to close database connection cleanly");
    }

    outcome
}

/// Enable the configured extensions, then execute the configured script
/// through `executor`.
pub async fn provision<E>(
    executor: &mut E,
    config: &ProvisionConfig,
) -> Result<ProvisionReport, ProvisionError>
where
    E: StatementExecutor,
{
    let started = Instant::now();

    for name in &config.extensions {
        ensure_extension(executor, name)
            .await
            .map_err(|source| ProvisionError::Extension {
                name: name.clone(),
                source,
            })?;
        tracing::info!(extension = %name, "Extension enabled");
    }

    let batch = load_script(&config.sql_file, config.boundary).await?;
    let statements_executed = execute_batch(executor, &batch).await?;

    Ok(ProvisionReport {
        extensions_enabled: config.extensions.len(),
        statements_executed,
        fragments_skipped: batch.skipped(),
        elapsed: started.elapsed(),
    })
}

/// Read the script at `path` and split it into statements.
pub async fn load_script(path: &Path, boundary: Boundary) -> Result<StatementBatch, ProvisionError> {
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ProvisionError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let batch = StatementBatch::parse(&sql, boundary);
    tracing::info!(
        path = %path.display(),
        statements = batch.len(),
        skipped = batch.skipped(),
        "SQL script loaded",
    );

    Ok(batch)
}

/// Execute every statement of `batch` in order, stopping at the first
/// failure. Returns the number of statements executed.
pub async fn execute_batch<E>(executor: &mut E, batch: &StatementBatch) -> Result<usize, ProvisionError>
where
    E: StatementExecutor,
{
    for statement in batch {
        let rows_affected = executor
            .execute_sql(&statement.sql)
            .await
            .map_err(|source| ProvisionError::Statement {
                ordinal: statement.ordinal,
                line: statement.line,
                statement: statement.sql.clone(),
                source,
            })?;

        tracing::info!(
            ordinal = statement.ordinal,
            line = statement.line,
            rows_affected,
            "Executed: {}",
            statement.preview(),
        );
    }

    Ok(batch.len())
}

//! `dbsetup` -- one-shot PostgreSQL provisioner.
//!
//! Connects to the database, enables `pgcrypto`, and executes the
//! statements of `database.sql` in file order. Safe to re-run as long as
//! the script itself is idempotent. Exits with status 1 on the first
//! failure.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default                | Description                          |
//! |--------------------------|----------|------------------------|--------------------------------------|
//! | `DATABASE_URL`           | yes      | --                     | PostgreSQL connection string         |
//! | `DATABASE_SQL_FILE`      | no       | `database.sql`         | Script to execute                    |
//! | `DATABASE_TLS`           | no       | `accept-invalid-certs` | `disable`, `prefer`, `accept-invalid-certs`, `verify-ca`, `verify-full` |
//! | `SQL_STATEMENT_BOUNDARY` | no       | `end-of-line`          | `end-of-line` or `terminator`        |
//! | `REQUIRED_EXTENSIONS`    | no       | `pgcrypto`             | Comma-separated extension names      |
//!
//! A `.env` file in the working directory is loaded first if present.

use dbsetup::config::ProvisionConfig;
use dbsetup::error::ProvisionError;
use dbsetup::runner::{self, ProvisionReport};

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Progress goes to stdout, warnings and errors to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dbsetup=info,dbsetup_db=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout)),
        )
        .init();

    match provision().await {
        Ok(report) => {
            tracing::info!(
                extensions = report.extensions_enabled,
                statements = report.statements_executed,
                skipped = report.fragments_skipped,
                elapsed = ?report.elapsed,
                "All statements executed successfully",
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Provisioning failed");
            std::process::exit(1);
        }
    }
}

async fn provision() -> Result<ProvisionReport, ProvisionError> {
    let config = ProvisionConfig::from_env()?;
    tracing::debug!(?config, "Loaded provisioning configuration");
    runner::run(&config).await
}

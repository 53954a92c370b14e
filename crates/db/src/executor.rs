//! Statement execution interface.
//!
//! Defines [`StatementExecutor`], the seam between the provisioning runner
//! and the database connection.

use std::future::Future;

use sqlx::{Executor, PgConnection};

/// Anything that can run one SQL statement at a time.
///
/// Statements are sent verbatim and without parameters, so DDL, `DO`
/// blocks and function definitions run as written.
pub trait StatementExecutor: Send {
    /// Execute `sql` and return the number of rows it affected.
    fn execute_sql(&mut self, sql: &str)
        -> impl Future<Output = Result<u64, sqlx::Error>> + Send;

    /// Release the underlying connection. Executors without one have
    /// nothing to release.
    fn close(self) -> impl Future<Output = Result<(), sqlx::Error>> + Send
    where
        Self: Sized,
    {
        async { Ok(()) }
    }
}

impl StatementExecutor for PgConnection {
    async fn execute_sql(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        // Simple-query protocol: nothing is prepared.
        let result = Executor::execute(&mut *self, sqlx::raw_sql(sql)).await?;
        Ok(result.rows_affected())
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        sqlx::Connection::close(self).await
    }
}

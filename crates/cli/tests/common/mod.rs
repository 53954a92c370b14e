use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dbsetup::config::ProvisionConfig;
use dbsetup_core::split::Boundary;
use dbsetup_db::{StatementExecutor, TlsPolicy};

/// Executor that records every statement it accepts instead of talking to a
/// database. Statements containing `fail_on` are rejected.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub executed: Vec<String>,
    pub fail_on: Option<String>,
    /// Set once `close` has run; shared because `close` consumes the executor.
    pub closed: Arc<AtomicBool>,
    pub fail_close: bool,
    /// Simulated server time per statement.
    pub delay: Option<Duration>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn was_closed(flag: &AtomicBool) -> bool {
        flag.load(Ordering::SeqCst)
    }

    /// Executed statements other than the extension setup.
    pub fn script_statements(&self) -> Vec<&str> {
        self.executed
            .iter()
            .map(String::as_str)
            .filter(|sql| !sql.starts_with("CREATE EXTENSION"))
            .collect()
    }
}

impl StatementExecutor for RecordingExecutor {
    async fn execute_sql(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(needle) = &self.fail_on {
            if sql.contains(needle.as_str()) {
                return Err(sqlx::Error::Protocol(format!(
                    "syntax error at or near \"{needle}\""
                )));
            }
        }
        self.executed.push(sql.to_string());
        Ok(1)
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(sqlx::Error::Protocol("connection reset".to_string()));
        }
        Ok(())
    }
}

/// Write `body` to a temporary `.sql` file.
pub fn write_script(body: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(".sql")
        .tempfile()
        .expect("create temp file");
    write!(f, "{body}").expect("write script");
    f
}

/// Configuration pointing at `sql_file` with default settings.
pub fn test_config(sql_file: &Path) -> ProvisionConfig {
    ProvisionConfig {
        database_url: "postgres://localhost/provision_test".to_string(),
        sql_file: sql_file.to_path_buf(),
        tls: TlsPolicy::Disable,
        boundary: Boundary::EndOfLine,
        extensions: vec!["pgcrypto".to_string()],
    }
}

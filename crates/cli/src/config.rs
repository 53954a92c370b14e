use std::path::PathBuf;
use std::str::FromStr;

use dbsetup_core::error::CoreError;
use dbsetup_core::identifier::validate_identifier;
use dbsetup_core::split::Boundary;
use dbsetup_db::extension::PGCRYPTO;
use dbsetup_db::TlsPolicy;

/// Script executed when `DATABASE_SQL_FILE` is not set.
pub const DEFAULT_SQL_FILE: &str = "database.sql";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var}: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: CoreError,
    },
}

/// Provisioning configuration loaded from environment variables.
#[derive(Clone)]
pub struct ProvisionConfig {
    /// PostgreSQL connection string. May carry credentials, so it is never
    /// logged.
    pub database_url: String,
    /// SQL script, relative to the working directory unless absolute.
    pub sql_file: PathBuf,
    pub tls: TlsPolicy,
    pub boundary: Boundary,
    /// Extensions enabled before the script runs, in order.
    pub extensions: Vec<String>,
}

impl ProvisionConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                |
    /// |--------------------------|------------------------|
    /// | `DATABASE_URL`           | -- (required)          |
    /// | `DATABASE_SQL_FILE`      | `database.sql`         |
    /// | `DATABASE_TLS`           | `accept-invalid-certs` |
    /// | `SQL_STATEMENT_BOUNDARY` | `end-of-line`          |
    /// | `REQUIRED_EXTENSIONS`    | `pgcrypto`             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let sql_file = get("DATABASE_SQL_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SQL_FILE));

        let tls = parse_or_default(get("DATABASE_TLS"), "DATABASE_TLS")?;
        let boundary = parse_or_default(get("SQL_STATEMENT_BOUNDARY"), "SQL_STATEMENT_BOUNDARY")?;

        let extensions = match get("REQUIRED_EXTENSIONS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| {
                    validate_identifier(name)
                        .map(str::to_string)
                        .map_err(|source| ConfigError::Invalid {
                            var: "REQUIRED_EXTENSIONS",
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![PGCRYPTO.to_string()],
        };

        Ok(Self {
            database_url,
            sql_file,
            tls,
            boundary,
            extensions,
        })
    }
}

// Hand-written so the connection string never reaches a log line.
impl std::fmt::Debug for ProvisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionConfig")
            .field("database_url", &"<redacted>")
            .field("sql_file", &self.sql_file)
            .field("tls", &self.tls)
            .field("boundary", &self.boundary)
            .field("extensions", &self.extensions)
            .finish()
    }
}

fn parse_or_default<T>(value: Option<String>, var: &'static str) -> Result<T, ConfigError>
where
    T: FromStr<Err = CoreError> + Default,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|source| ConfigError::Invalid { var, source }),
        None => Ok(T::default()),
    }
}

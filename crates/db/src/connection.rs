//! Connection setup and TLS policy.

use std::fmt;
use std::str::FromStr;

use dbsetup_core::error::CoreError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};

/// How the connection negotiates TLS with the server.
///
/// The default encrypts the connection but accepts any server certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    /// Plain TCP only.
    Disable,
    /// TLS when the server offers it, without certificate checks.
    Prefer,
    /// TLS required; any certificate is trusted.
    #[default]
    AcceptInvalidCerts,
    /// TLS required; the certificate chain must be valid.
    VerifyCa,
    /// TLS required; chain and host name must be valid.
    VerifyFull,
}

impl TlsPolicy {
    pub fn ssl_mode(self) -> PgSslMode {
        match self {
            TlsPolicy::Disable => PgSslMode::Disable,
            TlsPolicy::Prefer => PgSslMode::Prefer,
            // sqlx only validates certificates in the verify modes.
            TlsPolicy::AcceptInvalidCerts => PgSslMode::Require,
            TlsPolicy::VerifyCa => PgSslMode::VerifyCa,
            TlsPolicy::VerifyFull => PgSslMode::VerifyFull,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TlsPolicy::Disable => "disable",
            TlsPolicy::Prefer => "prefer",
            TlsPolicy::AcceptInvalidCerts => "accept-invalid-certs",
            TlsPolicy::VerifyCa => "verify-ca",
            TlsPolicy::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for TlsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TlsPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(TlsPolicy::Disable),
            "prefer" => Ok(TlsPolicy::Prefer),
            "accept-invalid-certs" | "require" => Ok(TlsPolicy::AcceptInvalidCerts),
            "verify-ca" => Ok(TlsPolicy::VerifyCa),
            "verify-full" => Ok(TlsPolicy::VerifyFull),
            _ => Err(CoreError::InvalidSetting {
                setting: "TLS policy",
                value: s.to_string(),
                expected: "disable, prefer, accept-invalid-certs, verify-ca, verify-full",
            }),
        }
    }
}

/// Open a single dedicated connection to the database at `database_url`.
///
/// The TLS policy overrides any `sslmode` carried by the URL.
pub async fn connect(database_url: &str, tls: TlsPolicy) -> Result<PgConnection, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?.ssl_mode(tls.ssl_mode());

    if tls == TlsPolicy::AcceptInvalidCerts {
        tracing::warn!("TLS certificate validation is disabled; any server certificate is accepted");
    }

    let conn = PgConnection::connect_with(&options).await?;
    tracing::debug!(
        host = options.get_host(),
        database = ?options.get_database(),
        tls = %tls,
        "Database connection established",
    );

    Ok(conn)
}

//! `dbsetup-db` -- PostgreSQL plumbing for the provisioner.
//!
//! Opens the single connection a provisioning run uses, enables required
//! extensions, and exposes the [`StatementExecutor`] seam the runner drives.

pub mod connection;
pub mod executor;
pub mod extension;

pub use connection::{connect, TlsPolicy};
pub use executor::StatementExecutor;
pub use extension::ensure_extension;

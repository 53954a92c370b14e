//! `dbsetup` library crate.
//!
//! Re-exports the provisioning modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod runner;

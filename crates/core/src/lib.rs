//! `dbsetup-core` -- database-independent logic for the provisioner.
//!
//! Splits SQL scripts into executable statements and validates the
//! identifiers that get interpolated into generated SQL.

pub mod batch;
pub mod error;
pub mod identifier;
pub mod split;

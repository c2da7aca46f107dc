//! Command implementations used by the `odb` binary
//!
//! - `plumbing`: Direct object access (hash-object, cat-file)
//! - `porcelain`: Repository setup (init)
//!
//! Commands write their output to the given writer and return `anyhow` errors whose
//! root cause is an [`OdbError`](crate::errors::OdbError) whenever the core failed.

pub mod plumbing;
pub mod porcelain;

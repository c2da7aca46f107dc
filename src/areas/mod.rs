//! Repository components
//!
//! - `config`: The ini-style `.git/config` file
//! - `database`: Loose object store (hash, compress, read, write)
//! - `repository`: Repository discovery, validation and initialization

pub mod config;
pub mod database;
pub mod repository;

//! Content-addressed object database in the layout of git's loose objects
//!
//! - `areas`: Repository discovery/initialization and the object store
//! - `artifacts`: Object types and their payload codecs
//! - `commands`: Plumbing and porcelain commands used by the `odb` binary
//! - `errors`: Error taxonomy shared by every operation

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

//! Object model
//!
//! - `objects`: Object types (blob, tree, commit, tag), IDs and the canonical framing
pub mod objects;

//! Plumbing commands
//!
//! - `hash-object`: Compute an object ID and optionally store the object
//! - `cat-file`: Print the type, size or content of a stored object

pub mod cat_file;
pub mod hash_object;

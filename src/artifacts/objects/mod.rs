//! Object types and their payload codecs
//!
//! Every object is stored as canonical framing around a type-specific payload:
//! `<type> <size>\0<payload>`
//!
//! - **Blob**: opaque bytes
//! - **Tree**: `<mode> <name>\0<20-byte id>` entries
//! - **Commit**: headers, blank line, message
//! - **Tag**: headers, blank line, message

pub mod blob;
pub mod commit;
pub mod entry_mode;
pub mod frame;
pub mod headers;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod signature;
pub mod tag;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const RAW_OBJECT_ID_LENGTH: usize = 20;

//! Error taxonomy of the object database
//!
//! Every failure inside the library surfaces as one [`OdbError`] variant so callers
//! can tell a missing repository from a corrupt object without string matching.
//! The command layer wraps these in `anyhow` and maps each kind to an exit code.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    /// No metadata directory was found (upward search or explicit open).
    #[error("not a git repository (or any of the parent directories): {0}")]
    NotARepository(PathBuf),

    /// The requested object digest is not present in the store.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// A path that must be a directory is something else.
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("cannot find repository config at {0}")]
    ConfigMissing(PathBuf),

    #[error("unsupported repositoryformatversion '{0}'")]
    UnsupportedVersion(String),

    #[error("invalid config {path} (line {line}): {reason}")]
    InvalidConfig {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Initialization target already has content.
    #[error("destination '{0}' is not empty")]
    NonEmptyDestination(PathBuf),

    #[error("unknown object type '{0}'")]
    UnknownType(String),

    /// Payload failed its type-specific shape check.
    #[error("malformed {object_type} payload: {reason}")]
    MalformedPayload {
        object_type: &'static str,
        reason: String,
    },

    /// Stored bytes do not form a valid canonical object.
    #[error("corrupt object {id}: {reason}")]
    Corruption { id: String, reason: String },

    #[error("invalid object id '{0}'")]
    InvalidObjectId(String),

    /// Attempted to persist an object that was built without a repository.
    #[error("cannot write object without an associated repository")]
    MissingRepository,

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl OdbError {
    pub fn malformed(object_type: &'static str, reason: impl Into<String>) -> Self {
        OdbError::MalformedPayload {
            object_type,
            reason: reason.into(),
        }
    }

    pub fn corruption(id: impl Into<String>, reason: impl Into<String>) -> Self {
        OdbError::Corruption {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OdbError>;

/// Attach an operation description to an `io::Result`, in the spirit of
/// `anyhow::Context` but producing a typed [`OdbError::Io`].
pub trait IoContext<T> {
    fn io_context<C: Into<String>>(self, context: impl FnOnce() -> C) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<C: Into<String>>(self, context: impl FnOnce() -> C) -> Result<T> {
        self.map_err(|source| OdbError::Io {
            context: context().into(),
            source,
        })
    }
}

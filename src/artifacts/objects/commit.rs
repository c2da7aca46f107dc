//! Commit object
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Decoding only checks the header/body shape. The typed accessors validate
//! individual headers when asked, so a commit whose `tree` is not a digest still
//! decodes and re-encodes to the same bytes.

use crate::artifacts::objects::headers::Headers;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::signature::Signature;
use crate::errors::{OdbError, Result};
use bytes::Bytes;

const COMMIT: &str = "commit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    headers: Headers,
}

impl Commit {
    /// Create a commit with the conventional header order
    pub fn new(
        tree_oid: &ObjectId,
        parents: &[ObjectId],
        author: &Signature,
        committer: &Signature,
        message: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let mut headers = Headers::new(message);
        headers.push(COMMIT, "tree", tree_oid.as_ref())?;
        for parent in parents {
            headers.push(COMMIT, "parent", parent.as_ref())?;
        }
        headers.push(COMMIT, "author", author.to_string())?;
        headers.push(COMMIT, "committer", committer.to_string())?;

        Ok(Commit { headers })
    }

    /// Wrap arbitrary headers, e.g. to carry extra ones such as `gpgsig`
    pub fn from_headers(headers: Headers) -> Self {
        Commit { headers }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Message bytes, in the encoding named by the `encoding` header (UTF-8 if absent)
    pub fn message(&self) -> &[u8] {
        self.headers.body()
    }

    pub fn encoding(&self) -> Result<Option<&str>> {
        self.headers.get_text(COMMIT, "encoding")
    }

    pub fn tree_oid(&self) -> Result<ObjectId> {
        let tree = self
            .headers
            .get_text(COMMIT, "tree")?
            .ok_or_else(|| OdbError::malformed(COMMIT, "missing tree header"))?;
        ObjectId::try_parse(tree)
    }

    pub fn parents(&self) -> Result<Vec<ObjectId>> {
        self.headers
            .get_all("parent")
            .map(|parent| {
                std::str::from_utf8(parent)
                    .map_err(|_| OdbError::malformed(COMMIT, "parent header is not valid UTF-8"))
                    .and_then(ObjectId::try_parse)
            })
            .collect()
    }

    pub fn author(&self) -> Result<Signature> {
        self.signature("author")
    }

    pub fn committer(&self) -> Result<Signature> {
        self.signature("committer")
    }

    fn signature(&self, key: &str) -> Result<Signature> {
        let value = self
            .headers
            .get_text(COMMIT, key)?
            .ok_or_else(|| OdbError::malformed(COMMIT, format!("missing {key} header")))?;
        Signature::parse(COMMIT, value)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.headers.serialize().into())
    }
}

impl Unpackable for Commit {
    fn deserialize(payload: &[u8]) -> Result<Self> {
        Headers::parse(COMMIT, payload).map(Self::from_headers)
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> Bytes {
        self.headers.serialize().into()
    }
}

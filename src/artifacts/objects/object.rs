use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::frame::frame;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{OdbError, Result};
use bytes::Bytes;
use sha1::{Digest, Sha1};

/// Produces the type-specific payload (without framing)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Rebuilds a value from its payload, validating the payload shape
pub trait Unpackable {
    fn deserialize(payload: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Human-readable rendering, as printed by `cat-file -p`
    fn display(&self) -> Bytes;

    /// Canonical framing: `<type> <len>\0<payload>`
    fn encode(&self) -> Result<Bytes> {
        let payload = self.serialize()?;
        Ok(frame(self.object_type().as_str(), &payload))
    }

    /// Canonical bytes together with their SHA-1 digest
    fn hash(&self) -> Result<(Bytes, ObjectId)> {
        let canonical = self.encode()?;
        let digest = Sha1::digest(&canonical);

        Ok((canonical, ObjectId::from_digest(&digest)))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(self.hash()?.1)
    }
}

/// Closed set of object variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl ObjectKind {
    /// Type registry: dispatch a payload to the decoder for `object_type`
    pub fn decode(object_type: ObjectType, payload: &[u8]) -> Result<Self> {
        match object_type {
            ObjectType::Blob => Blob::deserialize(payload).map(ObjectKind::Blob),
            ObjectType::Tree => Tree::deserialize(payload).map(ObjectKind::Tree),
            ObjectType::Commit => Commit::deserialize(payload).map(ObjectKind::Commit),
            ObjectType::Tag => Tag::deserialize(payload).map(ObjectKind::Tag),
        }
    }

    fn as_object(&self) -> &dyn Object {
        match self {
            ObjectKind::Blob(blob) => blob,
            ObjectKind::Tree(tree) => tree,
            ObjectKind::Commit(commit) => commit,
            ObjectKind::Tag(tag) => tag,
        }
    }
}

impl Packable for ObjectKind {
    fn serialize(&self) -> Result<Bytes> {
        self.as_object().serialize()
    }
}

impl Object for ObjectKind {
    fn object_type(&self) -> ObjectType {
        self.as_object().object_type()
    }

    fn display(&self) -> Bytes {
        self.as_object().display()
    }
}

impl From<Blob> for ObjectKind {
    fn from(blob: Blob) -> Self {
        ObjectKind::Blob(blob)
    }
}

impl From<Tree> for ObjectKind {
    fn from(tree: Tree) -> Self {
        ObjectKind::Tree(tree)
    }
}

impl From<Commit> for ObjectKind {
    fn from(commit: Commit) -> Self {
        ObjectKind::Commit(commit)
    }
}

impl From<Tag> for ObjectKind {
    fn from(tag: Tag) -> Self {
        ObjectKind::Tag(tag)
    }
}

/// An object together with the repository it belongs to
///
/// The repository is a borrowed back-reference used only to resolve storage paths.
/// It is absent for objects built purely to be hashed. Equality ignores it: two
/// objects are equal when their type and payload are.
#[derive(Debug, Clone)]
pub struct GitObject<'r> {
    repository: Option<&'r Repository>,
    kind: ObjectKind,
}

impl<'r> GitObject<'r> {
    pub fn new(kind: impl Into<ObjectKind>, repository: Option<&'r Repository>) -> Self {
        GitObject {
            repository,
            kind: kind.into(),
        }
    }

    /// Object with no repository, usable for hashing only
    pub fn detached(kind: impl Into<ObjectKind>) -> GitObject<'static> {
        GitObject::new(kind, None)
    }

    /// Decode a payload given its on-disk type tag
    pub fn decode(
        type_tag: &str,
        payload: &[u8],
        repository: Option<&'r Repository>,
    ) -> Result<Self> {
        let object_type = ObjectType::try_from(type_tag)?;
        let kind = ObjectKind::decode(object_type, payload)?;

        Ok(Self::new(kind, repository))
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn into_kind(self) -> ObjectKind {
        self.kind
    }

    pub fn repository(&self) -> Option<&'r Repository> {
        self.repository
    }

    /// Persist into the owning repository's object store
    pub fn write(&self) -> Result<ObjectId> {
        let repository = self.repository.ok_or(OdbError::MissingRepository)?;
        repository.database().store(&self.kind)
    }
}

impl Packable for GitObject<'_> {
    fn serialize(&self) -> Result<Bytes> {
        self.kind.serialize()
    }
}

impl Object for GitObject<'_> {
    fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    fn display(&self) -> Bytes {
        self.kind.display()
    }
}

impl PartialEq for GitObject<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for GitObject<'_> {}

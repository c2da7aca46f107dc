use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{GitObject, Object};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::IoContext;
use std::io::Write;
use std::path::Path;

/// Hash `file` as an object of `object_type`, storing it when a repository is given
///
/// Non-blob payloads are decoded first, so a malformed commit is rejected instead
/// of being hashed.
pub fn hash_object(
    repository: Option<&Repository>,
    object_type: ObjectType,
    file: &Path,
    writer: &mut dyn Write,
) -> anyhow::Result<ObjectId> {
    let data = std::fs::read(file)
        .io_context(|| format!("Unable to read file {}", file.display()))?;

    let object = GitObject::decode(object_type.as_str(), &data, repository)?;
    let object_id = match repository {
        Some(_) => object.write()?,
        None => object.object_id()?,
    };

    writeln!(writer, "{object_id}")?;

    Ok(object_id)
}

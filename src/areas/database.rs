use crate::areas::repository::Repository;
use crate::artifacts::objects::frame::unframe;
use crate::artifacts::objects::object::{GitObject, Object};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{IoContext, OdbError, Result};
use bytes::Bytes;
use fake::rand;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Objects directory, relative to the metadata directory
pub const OBJECTS_DIR: &str = "objects";

/// Loose object store of one repository
#[derive(Debug, Clone, Copy)]
pub struct Database<'r> {
    repository: &'r Repository,
}

// TODO: implement packfiles for better performance and storage efficiency
impl<'r> Database<'r> {
    pub fn new(repository: &'r Repository) -> Self {
        Database { repository }
    }

    /// Storage path of `object_id`, relative to the metadata directory
    pub fn object_path(object_id: &ObjectId) -> PathBuf {
        Path::new(OBJECTS_DIR).join(object_id.to_path())
    }

    /// Resolve a user-supplied name to an object ID
    ///
    /// Only full digests are understood; abbreviations and refs are passed
    /// through as-is and rejected by the digest parser.
    pub fn resolve(&self, name: &str) -> Result<ObjectId> {
        ObjectId::try_parse(name.trim())
    }

    pub fn contains(&self, object_id: &ObjectId) -> Result<bool> {
        let path = self
            .repository
            .resolve_file(Self::object_path(object_id), false)?;
        Ok(path.is_file())
    }

    /// Hash, compress and write an object; returns its ID
    ///
    /// An object file that already exists is left untouched since its content is
    /// necessarily identical.
    pub fn store(&self, object: &dyn Object) -> Result<ObjectId> {
        let (canonical, object_id) = object.hash()?;
        let object_path = self
            .repository
            .resolve_file(Self::object_path(&object_id), true)?;

        if object_path.exists() {
            tracing::debug!(oid = %object_id, "object already stored");
        } else {
            self.write_object(&object_path, &canonical)?;
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    /// Read, inflate and decode the object named `name`
    pub fn load(&self, name: &str) -> Result<GitObject<'r>> {
        let object_id = self.resolve(name)?;
        let raw = self.read_raw(&object_id)?;
        let (type_tag, payload) = unframe(object_id.as_ref(), &raw)?;

        tracing::debug!(oid = %object_id, kind = type_tag, size = payload.len(), "loaded object");

        GitObject::decode(type_tag, payload, Some(self.repository))
    }

    /// Type and payload size of an object, validating its framing
    pub fn load_header(&self, name: &str) -> Result<(ObjectType, usize)> {
        let object_id = self.resolve(name)?;
        let raw = self.read_raw(&object_id)?;
        let (type_tag, payload) = unframe(object_id.as_ref(), &raw)?;

        Ok((ObjectType::try_from(type_tag)?, payload.len()))
    }

    fn read_raw(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_path = self
            .repository
            .resolve_file(Self::object_path(object_id), false)?;

        let compressed = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OdbError::ObjectNotFound(object_id.to_string()));
            }
            Err(e) => {
                return Err(e).io_context(|| {
                    format!("Unable to read object file {}", object_path.display())
                });
            }
        };

        Self::decompress(&compressed)
            .map_err(|e| OdbError::corruption(object_id.as_ref(), format!("cannot inflate: {e}")))
    }

    fn write_object(&self, object_path: &Path, canonical: &[u8]) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| OdbError::NotADirectory(object_path.to_path_buf()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let compressed = Self::compress(canonical)
            .io_context(|| "Unable to compress object content".to_string())?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .io_context(|| format!("Unable to open object file {}", temp_object_path.display()))?;

        let written = file.write_all(&compressed).and_then(|_| file.sync_all());
        drop(file);
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(e).io_context(|| {
                format!("Unable to write object file {}", temp_object_path.display())
            });
        }

        // rename the temp file to the object file to make it atomic
        if let Err(e) = std::fs::rename(&temp_object_path, object_path) {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(e).io_context(|| {
                format!("Unable to rename object file to {}", object_path.display())
            });
        }

        Ok(())
    }

    fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;

        Ok(decompressed.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

//! Tree object
//!
//! Trees list the entries of one directory snapshot: a mode, a name and the ID of
//! the object the entry points at.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are kept in the order they were given or stored in. Names are raw
//! bytes, as file names need not be UTF-8.

use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{OdbError, Result};
use bytes::Bytes;
use std::io::{BufRead, Cursor, Write};

const TREE: &str = "tree";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: Bytes,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: EntryMode, name: impl Into<Bytes>, oid: ObjectId) -> Self {
        TreeEntry {
            mode,
            name: name.into(),
            oid,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.iter().any(|&b| b == b'/' || b == 0) {
            return Err(OdbError::malformed(
                TREE,
                format!("invalid entry name '{}'", String::from_utf8_lossy(&self.name)),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries; names must be non-empty path components
    pub fn new(entries: Vec<TreeEntry>) -> Result<Self> {
        entries.iter().try_for_each(TreeEntry::validate)?;
        Ok(Tree { entries })
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for entry in &self.entries {
            let write_entry = |content: &mut Vec<u8>| -> std::io::Result<()> {
                write!(content, "{} ", entry.mode.as_str())?;
                content.extend_from_slice(&entry.name);
                content.push(0);
                entry.oid.write_h40_to(content)
            };
            write_entry(&mut content)
                .map_err(|e| OdbError::malformed(TREE, format!("cannot encode entry: {e}")))?;
        }

        Ok(content.into())
    }
}

impl Unpackable for Tree {
    fn deserialize(payload: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(payload);
        let mut entries = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader
                .read_until(b' ', &mut mode_bytes)
                .map_err(|e| OdbError::malformed(TREE, e.to_string()))?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(OdbError::malformed(TREE, "unexpected end of input in mode"));
            }

            let mode = std::str::from_utf8(&mode_bytes)
                .map_err(|_| OdbError::malformed(TREE, "entry mode is not ASCII"))?;
            let mode = EntryMode::try_from(mode)?;

            // Read "name\0"
            name_bytes.clear();
            reader
                .read_until(b'\0', &mut name_bytes)
                .map_err(|e| OdbError::malformed(TREE, e.to_string()))?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(OdbError::malformed(TREE, "unexpected end of input in name"));
            }
            let name = Bytes::copy_from_slice(&name_bytes);

            let oid = ObjectId::read_h40_from(&mut reader)
                .map_err(|_| OdbError::malformed(TREE, "unexpected end of input in object id"))?;

            let entry = TreeEntry::new(mode, name, oid);
            entry.validate()?;
            entries.push(entry);
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> Bytes {
        let mut display = Vec::new();

        for entry in &self.entries {
            display.extend_from_slice(
                format!(
                    "{:06o} {} {}\t",
                    entry.mode.as_u32(),
                    entry.mode.object_type(),
                    entry.oid
                )
                .as_bytes(),
            );
            display.extend_from_slice(&entry.name);
            display.push(b'\n');
        }

        display.into()
    }
}

use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{OdbError, Result};

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    Symlink,
}

/// Mode of a tree entry, as written in tree payloads
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum EntryMode {
    File(FileMode),
    Directory,
    Submodule,
}

impl EntryMode {
    /// Octal form used in tree payloads (no leading zero for directories)
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::File(FileMode::Symlink) => "120000",
            EntryMode::Directory => "40000",
            EntryMode::Submodule => "160000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::File(FileMode::Symlink) => 0o120000,
            EntryMode::Directory => 0o40000,
            EntryMode::Submodule => 0o160000,
        }
    }

    /// Type of the object an entry with this mode points at
    pub fn object_type(&self) -> &'static str {
        match self {
            EntryMode::File(_) => ObjectType::Blob.as_str(),
            EntryMode::Directory => ObjectType::Tree.as_str(),
            EntryMode::Submodule => ObjectType::Commit.as_str(),
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = OdbError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "100644" => Ok(EntryMode::File(FileMode::Regular)),
            "100755" => Ok(EntryMode::File(FileMode::Executable)),
            "120000" => Ok(EntryMode::File(FileMode::Symlink)),
            "40000" => Ok(EntryMode::Directory),
            "160000" => Ok(EntryMode::Submodule),
            _ => Err(OdbError::malformed(
                ObjectType::Tree.as_str(),
                format!("invalid entry mode '{value}'"),
            )),
        }
    }
}

#![allow(dead_code)]

pub mod command;
pub mod file;

/// Digest of the blob `hello\n`, as computed by git
pub const HELLO_BLOB_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

/// Digest of the empty tree
pub const EMPTY_TREE_OID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

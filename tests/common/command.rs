use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_odb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

pub fn run_odb_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("odb").expect("Failed to find odb binary");
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> std::process::Command {
    let mut cmd = std::process::Command::new("git");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Run `odb hash-object -w` on `file_name` and return the printed digest
pub fn odb_hash_object(dir: &Path, file_name: &str) -> String {
    let output = run_odb_command(dir, &["hash-object", "-w", file_name])
        .output()
        .expect("Failed to run odb hash-object");
    assert!(output.status.success(), "hash-object failed: {output:?}");

    String::from_utf8(output.stdout)
        .expect("hash-object printed invalid UTF-8")
        .trim()
        .to_string()
}

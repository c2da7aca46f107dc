use assert_fs::TempDir;
use bytes::Bytes;
use common::command::repository_dir;
use common::{EMPTY_TREE_OID, HELLO_BLOB_OID};
use odb::areas::repository::Repository;
use odb::artifacts::objects::blob::Blob;
use odb::artifacts::objects::commit::Commit;
use odb::artifacts::objects::entry_mode::{EntryMode, FileMode};
use odb::artifacts::objects::object::{GitObject, Object, ObjectKind};
use odb::artifacts::objects::object_type::ObjectType;
use odb::artifacts::objects::signature::Signature;
use odb::artifacts::objects::tag::Tag;
use odb::artifacts::objects::tree::{Tree, TreeEntry};
use odb::errors::OdbError;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn signature() -> Signature {
    let timestamp = chrono::DateTime::parse_from_rfc3339("2023-11-14T22:13:20+02:00")
        .expect("valid timestamp");
    Signature::new("Jane Doe", "jane@example.com", timestamp)
}

#[rstest]
fn created_repository_is_located_from_descendants(repository_dir: TempDir) {
    let created = Repository::create(repository_dir.path()).expect("Failed to create repository");
    let nested = created.worktree().join("src").join("deeply").join("nested");
    std::fs::create_dir_all(&nested).expect("Failed to create nested dir");

    let located = Repository::locate(&nested).expect("Failed to locate repository");

    assert_eq!(located.worktree(), created.worktree());
    assert_eq!(located.config().repository_format_version(), Some("0"));
}

#[rstest]
fn hashing_is_deterministic_and_repository_independent(repository_dir: TempDir) {
    let repository = Repository::create(repository_dir.path()).expect("Failed to create repository");

    let detached = GitObject::detached(Blob::new(Bytes::from_static(b"hello\n")));
    let attached = GitObject::new(Blob::new(Bytes::from_static(b"hello\n")), Some(&repository));

    assert_eq!(detached.object_id().unwrap().as_ref(), HELLO_BLOB_OID);
    assert_eq!(attached.object_id().unwrap(), detached.object_id().unwrap());
    assert_eq!(attached.write().unwrap(), detached.object_id().unwrap());
    assert!(matches!(detached.write(), Err(OdbError::MissingRepository)));
}

#[rstest]
fn stores_and_loads_every_object_type(repository_dir: TempDir) {
    let repository = Repository::create(repository_dir.path()).expect("Failed to create repository");

    let blob = GitObject::new(Blob::new(Bytes::from_static(b"fn main() {}\n")), Some(&repository));
    let blob_oid = blob.write().unwrap();

    let empty_tree = GitObject::new(Tree::default(), Some(&repository));
    assert_eq!(empty_tree.write().unwrap().as_ref(), EMPTY_TREE_OID);

    let tree = Tree::new(vec![
        TreeEntry::new(EntryMode::File(FileMode::Regular), "main.rs".to_string(), blob_oid.clone()),
        TreeEntry::new(
            EntryMode::Directory,
            "empty".to_string(),
            empty_tree.object_id().unwrap(),
        ),
    ])
    .unwrap();
    let tree = GitObject::new(tree, Some(&repository));
    let tree_oid = tree.write().unwrap();

    let commit = Commit::new(&tree_oid, &[], &signature(), &signature(), "Initial commit\n").unwrap();
    let commit = GitObject::new(commit, Some(&repository));
    let commit_oid = commit.write().unwrap();

    let tag = Tag::new(&commit_oid, ObjectType::Commit, "v1.0", &signature(), "Release\n").unwrap();
    let tag = GitObject::new(tag, Some(&repository));
    let tag_oid = tag.write().unwrap();

    let database = repository.database();
    for (oid, expected) in [
        (&blob_oid, &blob),
        (&tree_oid, &tree),
        (&commit_oid, &commit),
        (&tag_oid, &tag),
    ] {
        let loaded = database.load(oid.as_ref()).unwrap();
        assert_eq!(&loaded, expected);
        assert_eq!(loaded.object_id().unwrap(), *oid);
        assert!(loaded.repository().is_some());
    }

    let ObjectKind::Commit(loaded_commit) = database.load(commit_oid.as_ref()).unwrap().into_kind()
    else {
        panic!("expected a commit");
    };
    assert_eq!(loaded_commit.tree_oid().unwrap(), tree_oid);
    assert!(loaded_commit.parents().unwrap().is_empty());
    assert_eq!(loaded_commit.author().unwrap(), signature());
    assert_eq!(loaded_commit.message(), b"Initial commit\n");

    let ObjectKind::Tree(loaded_tree) = database.load(tree_oid.as_ref()).unwrap().into_kind()
    else {
        panic!("expected a tree");
    };
    let names: Vec<&[u8]> = loaded_tree.entries().map(|entry| &entry.name[..]).collect();
    assert_eq!(names, vec![&b"main.rs"[..], &b"empty"[..]]);

    let ObjectKind::Tag(loaded_tag) = database.load(tag_oid.as_ref()).unwrap().into_kind() else {
        panic!("expected a tag");
    };
    assert_eq!(loaded_tag.target().unwrap(), commit_oid);
    assert_eq!(loaded_tag.target_type().unwrap(), ObjectType::Commit);
    assert_eq!(loaded_tag.name().unwrap(), "v1.0");
}

#[rstest]
fn loaded_blob_matches_written_bytes_exactly(repository_dir: TempDir) {
    let repository = Repository::create(repository_dir.path()).expect("Failed to create repository");
    let content: Vec<u8> = (0..=255u8).chain([0, 0, b'\n']).collect();

    let oid = GitObject::new(Blob::new(Bytes::from(content.clone())), Some(&repository))
        .write()
        .unwrap();

    let ObjectKind::Blob(blob) = repository.database().load(oid.as_ref()).unwrap().into_kind()
    else {
        panic!("expected a blob");
    };
    assert_eq!(blob.content().as_ref(), content.as_slice());
}

#[rstest]
fn truncated_object_file_is_corruption(repository_dir: TempDir) {
    let repository = Repository::create(repository_dir.path()).expect("Failed to create repository");
    let oid = GitObject::new(Blob::new(Bytes::from_static(b"hello\n")), Some(&repository))
        .write()
        .unwrap();

    let path = repository.git_dir().join("objects").join(oid.to_path());
    let compressed = std::fs::read(&path).unwrap();
    std::fs::write(&path, &compressed[..compressed.len() / 2]).unwrap();

    assert!(matches!(
        repository.database().load(oid.as_ref()),
        Err(OdbError::Corruption { .. })
    ));
}

#[rstest]
fn opening_a_plain_directory_fails(repository_dir: TempDir) {
    assert!(matches!(
        Repository::open(repository_dir.path()),
        Err(OdbError::NotARepository(_))
    ));
}

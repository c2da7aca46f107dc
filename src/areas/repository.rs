//! Repository discovery and initialization
//!
//! A repository is a working directory plus its `.git` metadata directory. It is
//! either opened (validated: the metadata directory exists and carries a config
//! with a supported format version) or force-constructed for initialization.

use crate::areas::config::{Config, REPOSITORY_FORMAT_VERSION};
use crate::areas::database::Database;
use crate::errors::{IoContext, OdbError, Result};
use std::path::{Path, PathBuf};

/// Name of the metadata directory inside the working root
pub const GIT_DIR: &str = ".git";

pub const CONFIG_FILE: &str = "config";

const DEFAULT_BRANCH: &str = "master";

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

#[derive(Debug)]
pub struct Repository {
    worktree: Box<Path>,
    git_dir: Box<Path>,
    config: Config,
}

impl Repository {
    /// Open the repository rooted at `worktree`, validating its metadata directory
    pub fn open(worktree: impl AsRef<Path>) -> Result<Self> {
        let worktree = worktree.as_ref();
        let git_dir = worktree.join(GIT_DIR);
        let config = Self::validate(&git_dir)?;

        Ok(Repository {
            worktree: worktree.into(),
            git_dir: git_dir.into_boxed_path(),
            config,
        })
    }

    /// Construct without any checks; only meant for initialization
    pub fn force(worktree: impl AsRef<Path>) -> Self {
        let worktree = worktree.as_ref();

        Repository {
            worktree: worktree.into(),
            git_dir: worktree.join(GIT_DIR).into_boxed_path(),
            config: Config::default_repository(),
        }
    }

    /// Find the repository containing `start` by walking up parent directories
    ///
    /// `start` does not have to exist. The walk is lexical and stops once a path
    /// has no parent left, which is the filesystem root on every platform.
    pub fn locate(start: impl AsRef<Path>) -> Result<Self> {
        let start = std::path::absolute(start.as_ref()).io_context(|| {
            format!("Unable to resolve path {}", start.as_ref().display())
        })?;

        let mut current = start.as_path();
        loop {
            if current.join(GIT_DIR).exists() {
                tracing::debug!(worktree = %current.display(), "found metadata directory");
                return Self::open(current);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return Err(OdbError::NotARepository(start)),
            }
        }
    }

    /// Check that `git_dir` is a usable metadata directory and load its config
    pub fn validate(git_dir: &Path) -> Result<Config> {
        if !git_dir.exists() {
            return Err(OdbError::NotARepository(git_dir.to_path_buf()));
        }
        if !git_dir.is_dir() {
            return Err(OdbError::NotADirectory(git_dir.to_path_buf()));
        }

        let config_path = git_dir.join(CONFIG_FILE);
        if !config_path.is_file() {
            return Err(OdbError::ConfigMissing(config_path));
        }

        let config = Config::load(&config_path)?;
        match config.repository_format_version() {
            Some(REPOSITORY_FORMAT_VERSION) => Ok(config),
            Some(version) => Err(OdbError::UnsupportedVersion(version.to_string())),
            None => Err(OdbError::UnsupportedVersion(String::new())),
        }
    }

    /// Initialize an empty repository at `destination`
    ///
    /// The destination must be missing (it is created) or an empty directory.
    /// Stops at the first failure.
    pub fn create(destination: impl AsRef<Path>) -> Result<Self> {
        let destination = destination.as_ref();
        Self::prepare_destination(destination)?;

        let worktree = destination
            .canonicalize()
            .io_context(|| format!("Unable to resolve path {}", destination.display()))?;
        let repository = Self::force(&worktree);

        for dir in ["branches", "objects", "refs/tags", "refs/heads"] {
            repository.resolve_dir(dir, true)?;
        }

        repository.write_file("description", DEFAULT_DESCRIPTION)?;
        repository.write_file("HEAD", &format!("ref: refs/heads/{DEFAULT_BRANCH}\n"))?;
        repository
            .config
            .save(&repository.resolve_file(CONFIG_FILE, true)?)?;

        tracing::info!(git_dir = %repository.git_dir.display(), "initialized repository");

        Ok(repository)
    }

    fn prepare_destination(destination: &Path) -> Result<()> {
        if !destination.exists() {
            return std::fs::create_dir_all(destination)
                .io_context(|| format!("Unable to create directory {}", destination.display()));
        }
        if !destination.is_dir() {
            return Err(OdbError::NotADirectory(destination.to_path_buf()));
        }

        let mut entries = std::fs::read_dir(destination)
            .io_context(|| format!("Unable to list directory {}", destination.display()))?;
        if entries.next().is_some() {
            return Err(OdbError::NonEmptyDestination(destination.to_path_buf()));
        }

        Ok(())
    }

    fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.resolve_file(relative, true)?;
        std::fs::write(&path, content)
            .io_context(|| format!("Unable to write file {}", path.display()))
    }

    /// Absolute path of a directory relative to the metadata directory
    ///
    /// With `mkdir`, missing directories (intermediates included) are created.
    /// An existing entry that is not a directory is an error either way.
    pub fn resolve_dir(&self, relative: impl AsRef<Path>, mkdir: bool) -> Result<PathBuf> {
        let path = self.git_dir.join(relative);

        if path.exists() {
            return if path.is_dir() {
                Ok(path)
            } else {
                Err(OdbError::NotADirectory(path))
            };
        }

        if mkdir {
            std::fs::create_dir_all(&path)
                .io_context(|| format!("Unable to create directory {}", path.display()))?;
        }

        Ok(path)
    }

    /// Absolute path of a file relative to the metadata directory
    ///
    /// Only the parent directories are checked or created, never the file itself.
    pub fn resolve_file(&self, relative: impl AsRef<Path>, mkdir: bool) -> Result<PathBuf> {
        let relative = relative.as_ref();
        if let Some(parent) = relative.parent() {
            self.resolve_dir(parent, mkdir)?;
        }

        Ok(self.git_dir.join(relative))
    }

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> Database<'_> {
        Database::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> assert_fs::TempDir {
        assert_fs::TempDir::new().expect("Failed to create temp dir")
    }

    #[test]
    fn create_lays_out_metadata_directory() {
        let dir = temp_dir();
        let repository = Repository::create(dir.path()).unwrap();
        let git_dir = repository.git_dir();

        for sub in ["branches", "objects", "refs/tags", "refs/heads"] {
            assert!(git_dir.join(sub).is_dir(), "{sub}");
        }
        for file in ["description", "HEAD", "config"] {
            assert!(git_dir.join(file).is_file(), "{file}");
        }
        assert_eq!(
            std::fs::read_to_string(git_dir.join("HEAD")).unwrap(),
            "ref: refs/heads/master\n"
        );
    }

    #[test]
    fn create_makes_missing_destination() {
        let dir = temp_dir();
        let destination = dir.path().join("a").join("b");

        let repository = Repository::create(&destination).unwrap();
        assert!(repository.git_dir().join("objects").is_dir());
    }

    #[test]
    fn create_rejects_non_empty_destination_and_writes_nothing() {
        let dir = temp_dir();
        std::fs::write(dir.path().join("existing.txt"), "content").unwrap();

        assert!(matches!(
            Repository::create(dir.path()),
            Err(OdbError::NonEmptyDestination(_))
        ));
        assert!(!dir.path().join(GIT_DIR).exists());
    }

    #[test]
    fn create_rejects_regular_file_destination() {
        let dir = temp_dir();
        let file = dir.path().join("file");
        std::fs::write(&file, "content").unwrap();

        assert!(matches!(
            Repository::create(&file),
            Err(OdbError::NotADirectory(_))
        ));
    }

    #[test]
    fn validate_distinguishes_failures() {
        let dir = temp_dir();
        let git_dir = dir.path().join(GIT_DIR);

        assert!(matches!(
            Repository::validate(&git_dir),
            Err(OdbError::NotARepository(_))
        ));

        std::fs::write(&git_dir, "gitdir: elsewhere").unwrap();
        assert!(matches!(
            Repository::validate(&git_dir),
            Err(OdbError::NotADirectory(_))
        ));

        std::fs::remove_file(&git_dir).unwrap();
        std::fs::create_dir(&git_dir).unwrap();
        assert!(matches!(
            Repository::validate(&git_dir),
            Err(OdbError::ConfigMissing(_))
        ));

        std::fs::write(git_dir.join(CONFIG_FILE), "[core]\n\trepositoryformatversion = 1\n").unwrap();
        assert!(matches!(
            Repository::validate(&git_dir),
            Err(OdbError::UnsupportedVersion(version)) if version == "1"
        ));

        std::fs::write(git_dir.join(CONFIG_FILE), "[core\n").unwrap();
        assert!(matches!(
            Repository::validate(&git_dir),
            Err(OdbError::InvalidConfig { line: 1, .. })
        ));

        std::fs::write(git_dir.join(CONFIG_FILE), "[core]\n\trepositoryformatversion = 0\n").unwrap();
        assert!(Repository::validate(&git_dir).is_ok());
    }

    #[test]
    fn resolve_dir_only_creates_when_asked() {
        let dir = temp_dir();
        let repository = Repository::create(dir.path()).unwrap();

        let path = repository.resolve_dir("objects/ab", false).unwrap();
        assert!(!path.exists());

        let path = repository.resolve_dir("objects/ab", true).unwrap();
        assert!(path.is_dir());

        let file = repository.resolve_file("objects/cd/rest", true).unwrap();
        assert!(file.parent().unwrap().is_dir());
        assert!(!file.exists());
    }

    #[test]
    fn resolve_dir_rejects_files() {
        let dir = temp_dir();
        let repository = Repository::create(dir.path()).unwrap();

        assert!(matches!(
            repository.resolve_dir("HEAD", true),
            Err(OdbError::NotADirectory(_))
        ));
    }

    #[test]
    fn locate_walks_up_from_missing_descendants() {
        let dir = temp_dir();
        let created = Repository::create(dir.path()).unwrap();

        let located = Repository::locate(created.worktree().join("sub").join("dir")).unwrap();
        assert_eq!(located.git_dir(), created.git_dir());
        assert_eq!(located.config(), created.config());
    }

    #[test]
    fn locate_terminates_at_the_root() {
        let dir = temp_dir();
        let deep = (0..64).fold(dir.path().to_path_buf(), |path, i| path.join(format!("d{i}")));

        // the temp dir normally lives outside any repository
        if Repository::locate(dir.path()).is_err() {
            assert!(matches!(
                Repository::locate(&deep),
                Err(OdbError::NotARepository(_))
            ));
        }
    }
}

use crate::areas::repository::Repository;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub fn init(path: &Path, writer: &mut dyn Write) -> anyhow::Result<Repository> {
        let repository = Repository::create(path)
            .with_context(|| format!("Failed to initialize repository in {}", path.display()))?;

        writeln!(
            writer,
            "Initialized empty Git repository in {}/",
            repository.git_dir().display()
        )?;

        Ok(repository)
    }
}

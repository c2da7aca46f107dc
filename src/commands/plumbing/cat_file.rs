use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// Print the object type
    Type,
    /// Print the payload size in bytes
    Size,
    /// Print the content in human-readable form
    Pretty,
    /// Print the raw payload, which must be of the given type
    Raw(ObjectType),
}

impl Repository {
    pub fn cat_file(
        &self,
        name: &str,
        mode: CatFileMode,
        writer: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let database = self.database();

        match mode {
            CatFileMode::Type => {
                let (object_type, _) = database.load_header(name)?;
                writeln!(writer, "{object_type}")?;
            }
            CatFileMode::Size => {
                let (_, size) = database.load_header(name)?;
                writeln!(writer, "{size}")?;
            }
            CatFileMode::Pretty => {
                let object = database.load(name)?;
                writer.write_all(&object.display())?;
            }
            CatFileMode::Raw(expected) => {
                let object = database.load(name)?;
                if object.object_type() != expected {
                    anyhow::bail!("{name}: bad file (object is a {})", object.object_type());
                }
                writer.write_all(&object.serialize()?)?;
            }
        }

        Ok(())
    }
}

use clap::{Parser, Subcommand};
use colored::Colorize;
use odb::areas::repository::Repository;
use odb::artifacts::objects::object_type::ObjectType;
use odb::commands::plumbing::cat_file::CatFileMode;
use odb::commands::plumbing::hash_object::hash_object;
use odb::errors::OdbError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "odb",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressed object database in git's loose-object layout",
    long_about = "This tool stores typed, compressed objects under a .git metadata directory \
    and addresses each one by the SHA-1 of its canonical form. \
    It covers repository initialization and direct object access only.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path. \
        The directory must be empty or not exist yet."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file as an object of the given type and can write it to the object database. \
        Writing requires a repository in the current directory or one of its parents."
    )]
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        object_type: String,
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the type, size or content of an object",
        long_about = "This command prints information about an object in the repository. \
        Use exactly one of -t, -s or -p with the object ID, or give the expected type followed by the object ID."
    )]
    CatFile {
        #[arg(short = 't', group = "mode", help = "Show the object type")]
        show_type: bool,
        #[arg(short = 's', group = "mode", help = "Show the object size")]
        show_size: bool,
        #[arg(short = 'p', group = "mode", help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(num_args = 1..=2, required = true, value_names = ["TYPE", "OBJECT"])]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "fatal:".red().bold());
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            Repository::init(&path, &mut stdout)?;
        }
        Commands::HashObject {
            object_type,
            write,
            file,
        } => {
            let object_type = ObjectType::try_from(object_type.as_str())?;
            let repository = if write {
                Some(Repository::locate(std::env::current_dir()?)?)
            } else {
                None
            };

            hash_object(repository.as_ref(), object_type, &file, &mut stdout)?;
        }
        Commands::CatFile {
            show_type,
            show_size,
            pretty,
            args,
        } => {
            let (mode, name) = match (show_type, show_size, pretty, args.as_slice()) {
                (true, _, _, [name]) => (CatFileMode::Type, name),
                (_, true, _, [name]) => (CatFileMode::Size, name),
                (_, _, true, [name]) => (CatFileMode::Pretty, name),
                (false, false, false, [object_type, name]) => (
                    CatFileMode::Raw(ObjectType::try_from(object_type.as_str())?),
                    name,
                ),
                _ => anyhow::bail!(
                    "usage: odb cat-file (-t | -s | -p | <type>) <object>"
                ),
            };

            let repository = Repository::locate(std::env::current_dir()?)?;
            repository.cat_file(name, mode, &mut stdout)?;
        }
    }

    Ok(())
}

/// Distinct non-zero status per error kind so scripts can tell failures apart
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<OdbError>() {
        Some(OdbError::NotARepository(_)) => 2,
        Some(OdbError::ObjectNotFound(_)) => 3,
        Some(OdbError::NotADirectory(_)) => 4,
        Some(OdbError::ConfigMissing(_)) => 5,
        Some(OdbError::UnsupportedVersion(_)) => 6,
        Some(OdbError::InvalidConfig { .. }) => 7,
        Some(OdbError::NonEmptyDestination(_)) => 8,
        Some(OdbError::UnknownType(_)) => 9,
        Some(OdbError::MalformedPayload { .. }) => 10,
        Some(OdbError::Corruption { .. }) => 11,
        Some(OdbError::InvalidObjectId(_)) => 12,
        Some(OdbError::MissingRepository) => 13,
        Some(OdbError::Io { .. }) => 14,
        None => 1,
    }
}

use crate::migration::Direction;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Pg(#[from] postgres::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("required environment variable {name} not set")]
    MissingEnv { name: String },
    #[error("environment variable {name} could not be parsed")]
    BadEnvFormat { name: String },
    #[error("unsupported database driver {driver:?}, expected \"postgres\"")]
    UnsupportedDriver { driver: String },
    #[error("missing {direction} script for migration {name}")]
    ScriptNotFound { name: String, direction: Direction },
    #[error("migration label must not be empty")]
    EmptyLabel,
    #[error("seeder name must not be empty")]
    EmptySeedName,
    #[error("seeder {name} already exists")]
    SeedExists { name: String },
    #[error("cannot roll back {steps} batches, only {applied} applied")]
    RollbackTooFar { steps: i32, applied: i32 },
}

/// The taxonomy class an error belongs to. The CLI boundary maps
/// `InvalidArgument` to exit code 2 and everything else to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Storage,
    Io,
    NotFound,
    InvalidArgument,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Pg(_) => ErrorKind::Storage,
            Error::Io(_) => ErrorKind::Io,
            Error::MissingEnv { .. } | Error::BadEnvFormat { .. } => ErrorKind::Config,
            Error::UnsupportedDriver { .. } => ErrorKind::Config,
            Error::ScriptNotFound { .. } => ErrorKind::NotFound,
            Error::EmptyLabel | Error::EmptySeedName => ErrorKind::InvalidArgument,
            Error::SeedExists { .. } => ErrorKind::InvalidArgument,
            Error::RollbackTooFar { .. } => ErrorKind::InvalidArgument,
        }
    }
}

use std::{io, path::PathBuf, process::ExitStatus};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

/// Various error types
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler process ran but exited unsuccessfully
    #[error("Compiler `{program}` failed in \"{}\" ({status}): {stderr}", .dir.display())]
    CompilerFailed { program: String, dir: PathBuf, status: ExitStatus, stderr: String },
    /// Two discovered sources share the same base name
    #[error(
        "Duplicate contract \"{name}\" found at \"{}\" and \"{}\"",
        .first.display(),
        .second.display()
    )]
    DuplicateContract { name: String, first: PathBuf, second: PathBuf },
    /// Filesystem IO error
    #[error(transparent)]
    Io(#[from] CompileIoError),
    /// Error while traversing a directory tree
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
    /// Error while copying files
    #[error(transparent)]
    FsExtra(#[from] fs_extra::error::Error),
    /// Invalid ignore pattern
    #[error(transparent)]
    Regex(#[from] regex::Error),
    /// Deserialization error
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    /// General purpose message
    #[error("{0}")]
    Message(String),
}

impl CompileError {
    pub(crate) fn io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        CompileIoError::new(err, path).into()
    }
    pub(crate) fn msg(msg: impl Into<String>) -> Self {
        CompileError::Message(msg.into())
    }
}

#[derive(Debug, Error)]
#[error("\"{}\": {io}", self.path.display())]
pub struct CompileIoError {
    io: io::Error,
    path: PathBuf,
}

impl CompileIoError {
    pub fn new(io: io::Error, path: impl Into<PathBuf>) -> Self {
        Self { io, path: path.into() }
    }

    /// The path at which the error occurred
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// The underlying io error
    pub fn io_error(&self) -> &io::Error {
        &self.io
    }
}

impl From<CompileIoError> for io::Error {
    fn from(err: CompileIoError) -> Self {
        err.io
    }
}

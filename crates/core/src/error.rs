use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("a file with the same name already exists: {}", path.display())]
    Conflict { path: PathBuf },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("filesystem operation failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RenameResult<T> = Result<T, RenameError>;

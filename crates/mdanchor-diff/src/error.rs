use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("git is not available in PATH")]
    GitNotFound,

    #[error("git diff failed: {0}")]
    GitFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

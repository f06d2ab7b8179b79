use std::path::PathBuf;

use thiserror::Error;

/// Named error kinds for the object/reference/index/merge core. The CLI
/// layer maps each variant to a process exit code; library code matches on
/// variants rather than formatting.
#[derive(Debug, Error)]
pub enum FangsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("path '{0}' is outside the repository")]
    InvalidPath(PathBuf),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unknown branch '{0}'")]
    UnknownBranch(String),

    #[error("HEAD is detached; this operation requires being on a branch")]
    DetachedHead,

    #[error("nothing to commit (index is empty)")]
    NothingToCommit,

    #[error("expected object of kind '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    #[error("corrupt object {0}: {1}")]
    CorruptObject(String, String),

    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),

    #[error("symbolic reference cycle detected at '{0}'")]
    CycleError(String),
}

impl FangsError {
    /// Coarse exit-code family for the CLI boundary. Validation-shaped
    /// errors, not-found-shaped errors, and I/O failures get distinct
    /// ranges so scripts can branch on them without parsing messages.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidPath(_)
            | Self::NothingToCommit
            | Self::DetachedHead
            | Self::TypeMismatch { .. } => 1,
            Self::NotFound(_) | Self::UnknownBranch(_) => 2,
            Self::CorruptObject(..) | Self::CycleError(_) => 3,
            Self::IoFailure(_) => 4,
        }
    }
}

//! Error taxonomy for hdls.
//!
//! Every failure aborts the whole invocation, so there is one [Error] enum covering
//! configuration, authentication, path and transport errors. Nothing is retried locally.

use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No namenode address could be resolved, or the settings are invalid.
    #[error("{0}")]
    Configuration(String),

    /// Keytab or kerberos configuration could not be used to log in.
    #[error("login failed: {0}")]
    Authentication(String),

    #[error(transparent)]
    Path(#[from] PathError),

    /// Transport-level failure, mid-operation or while writing output.
    #[error("{0}")]
    Io(String),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn auth(msg: impl Into<String>) -> Self {
        Error::Authentication(msg.into())
    }

    pub(crate) fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathErrorKind {
    NotFound,
    NotADirectory,
    PermissionDenied,
}

impl fmt::Display for PathErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PathErrorKind::NotFound => "file does not exist",
            PathErrorKind::NotADirectory => "not a directory",
            PathErrorKind::PermissionDenied => "permission denied",
        })
    }
}

/// A failed operation on a single remote path, rendered as `op path: reason`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{op} {path}: {kind}")]
pub struct PathError {
    pub op: &'static str,
    pub path: String,
    pub kind: PathErrorKind,
}

impl PathError {
    pub fn new(op: &'static str, path: impl Into<String>, kind: PathErrorKind) -> Self {
        Self {
            op,
            path: path.into(),
            kind,
        }
    }

    pub fn not_found(op: &'static str, path: impl Into<String>) -> Self {
        Self::new(op, path, PathErrorKind::NotFound)
    }

    pub fn not_a_directory(op: &'static str, path: impl Into<String>) -> Self {
        Self::new(op, path, PathErrorKind::NotADirectory)
    }

    pub fn permission_denied(op: &'static str, path: impl Into<String>) -> Self {
        Self::new(op, path, PathErrorKind::PermissionDenied)
    }
}

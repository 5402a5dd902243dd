//! Error types for BSpec.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for BSpec operations.
///
/// Validation problems are not represented here; they are collected as
/// plain strings so a caller can report every violation at once.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed frontmatter, compressed stream, container stream or JSON.
    #[error("{}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// A required file or directory is missing.
    #[error("{message}: {}", path.display())]
    NotFound { path: PathBuf, message: String },

    /// A path escapes the directory it must stay inside.
    #[error("security violation at {}: {message}", path.display())]
    Security { path: PathBuf, message: String },

    /// I/O failure against a concrete path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Format,
    NotFound,
    Security,
    Io,
    Config,
    Serialization,
}

impl Error {
    /// Create a format error for the given path.
    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error for the given path.
    pub fn not_found(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a security error for the given path.
    pub fn security(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Security {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error, promoting `NotFound` kinds to [`Error::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path,
                message: "file not found".to_string(),
            }
        } else {
            Self::Io { path, source }
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Format { .. } => ErrorCategory::Format,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Security { .. } => ErrorCategory::Security,
            Self::Io { .. } => ErrorCategory::Io,
            Self::Config(_) => ErrorCategory::Config,
            Self::Serialization(_) => ErrorCategory::Serialization,
        }
    }

    /// The path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Format { path, .. }
            | Self::NotFound { path, .. }
            | Self::Security { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::Config(_) | Self::Serialization(_) => None,
        }
    }
}

/// Result type alias using BSpec's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_is_promoted() {
        let err = Error::io("/missing/manifest.json", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.path(), Some(Path::new("/missing/manifest.json")));
    }

    #[test]
    fn test_io_other_kinds_stay_io() {
        let err = Error::io("/locked", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_display_carries_path() {
        let err = Error::format("documents/a.md", "missing frontmatter");
        assert_eq!(err.to_string(), "documents/a.md: missing frontmatter");

        let err = Error::not_found("/tmp/x/manifest.json", "manifest.json not found");
        assert!(err.to_string().contains("manifest.json not found"));
        assert!(err.to_string().contains("/tmp/x/manifest.json"));
    }

    #[test]
    fn test_config_has_no_path() {
        assert!(Error::config("bad").path().is_none());
        assert_eq!(Error::serialization("x").category(), ErrorCategory::Serialization);
    }
}

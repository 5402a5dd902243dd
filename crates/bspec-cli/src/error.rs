//! CLI error handling and reporting.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use bspec_common_config::ConfigError;
use bspec_common_core::Error as CoreError;
use bspec_output::OutputError;
use bspec_query::QueryError;
use thiserror::Error;

use crate::Exit;

/// CLI error type with a stable code and exit status
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Format {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    NotFound {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Security {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    User {
        message: String,
        hint: Option<String>,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::Format { .. } => "E003",
            Self::Validation { .. } => "E004",
            Self::NotFound { .. } => "E005",
            Self::Security { .. } => "E006",
            Self::User { .. } => "E007",
            Self::Other(_) => "E999",
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        let exit = match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Format { .. } => Exit::FormatError,
            Self::Validation { .. } => Exit::ValidationError,
            Self::NotFound { .. } => Exit::NotFound,
            Self::Security { .. } => Exit::Security,
            Self::User { .. } | Self::Other(_) => Exit::GeneralError,
        };
        exit.into()
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::User { hint, .. } => hint.as_deref(),
            Self::NotFound { .. } => Some("check the path and try again"),
            _ => None,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a path
    pub fn not_found(what: &str, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::NotFound {
            message: format!("{what} not found: {}", path.display()),
            path: Some(path),
        }
    }

    /// Create a user error with hint
    pub fn user_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// Print an error to stderr as `error[CODE]: message`, followed by a hint if any.
pub fn report(error: &CliError) {
    eprintln!("error[{}]: {error}", error.code());
    if let Some(hint) = error.hint() {
        eprintln!("\nhint: {hint}");
    }
}

// Conversion implementations
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let path = err.path().map(PathBuf::from);
        match err {
            CoreError::Io { source, path } => Self::Io {
                message,
                source,
                path: Some(path),
            },
            CoreError::Format { .. } | CoreError::Serialization(_) => Self::Format { message, path },
            CoreError::NotFound { .. } => Self::NotFound { message, path },
            CoreError::Security { .. } => Self::Security { message, path },
            CoreError::Config(message) => Self::User { message, hint: None },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            hint: Some("Check your .bspec/config.yaml file".to_string()),
        }
    }
}

impl From<OutputError> for CliError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::UnsupportedFormat(_) => Self::Config {
                message: err.to_string(),
                hint: Some("supported formats: json, yaml, markdown".to_string()),
            },
            other => Self::Other(other.into()),
        }
    }
}

impl From<QueryError> for CliError {
    fn from(err: QueryError) -> Self {
        Self::User {
            message: err.to_string(),
            hint: None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_category() {
        let err: CliError = CoreError::format("a.bspec", "invalid container stream").into();
        assert_eq!(err.code(), "E003");
        assert_eq!(err.to_string(), "a.bspec: invalid container stream");

        let err: CliError = CoreError::not_found("x/manifest.json", "manifest not found").into();
        assert!(matches!(err, CliError::NotFound { path: Some(ref p), .. } if p.ends_with("manifest.json")));

        let err: CliError = CoreError::security("../evil", "entry escapes extraction directory").into();
        assert_eq!(err.code(), "E006");

        let err: CliError = CoreError::config("directory already exists: demo").into();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn test_io_errors_keep_source() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: CliError = CoreError::io("/tmp/x", io).into();
        match err {
            CliError::Io { source, path, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
                assert_eq!(path, Some(PathBuf::from("/tmp/x")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_format_is_config() {
        let err: CliError = OutputError::UnsupportedFormat("xml".into()).into();
        assert_eq!(err.code(), "E001");
        assert_eq!(err.hint(), Some("supported formats: json, yaml, markdown"));
    }

    #[test]
    fn test_query_errors_are_user_errors() {
        let err: CliError = QueryError::NegativeLimit.into();
        assert_eq!(err.code(), "E007");
        assert_eq!(err.to_string(), "limit cannot be negative");
    }
}

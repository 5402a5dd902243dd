//! Result extensions.

use crate::error::{Error, Result};
use std::io;
use std::path::Path;

/// Extension trait for I/O results.
pub trait ResultExt<T> {
    /// Attach the path the I/O operation was acting on.
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;

    /// Convert any failure into a format error for the given path.
    fn or_format(self, path: impl AsRef<Path>, message: &str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| Error::io(path.as_ref(), e))
    }

    fn or_format(self, path: impl AsRef<Path>, message: &str) -> Result<T> {
        self.map_err(|e| Error::format(path.as_ref(), format!("{message}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_with_path() {
        let io_result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        let err = io_result.with_path("/tmp/test.txt").unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, Path::new("/tmp/test.txt")),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_or_format() {
        let io_result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream"));
        let err = io_result.or_format("a.bspec", "invalid gzip stream").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
        assert!(err.to_string().contains("invalid gzip stream"));
        assert!(err.to_string().contains("corrupt deflate stream"));
    }
}

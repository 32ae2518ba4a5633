//! Typed error handling for zombiescan.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for zombiescan operations.
///
/// This provides typed errors that library consumers can match on,
/// unlike opaque `anyhow::Error` types.
#[derive(Error, Debug)]
pub enum ZombiescanError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Path escapes the scan root or contains forbidden components
    #[error("Path traversal at {path}: {message}")]
    PathTraversal { path: PathBuf, message: String },

    /// Path resolves onto a different filesystem device than the scan root
    #[error("Cross-device path: {path}")]
    CrossDevice { path: PathBuf },

    /// Permission denied while accessing a path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// A required path does not exist
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// Expected a directory but found something else
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Backup id does not match the required 32-hex shape
    #[error("Invalid backup id: {id}")]
    InvalidBackupId { id: String },

    /// No backup exists with the given id
    #[error("Backup not found: {id}")]
    BackupNotFound { id: String },

    /// An operation completed for some items but not all
    #[error("Partial failure: {succeeded}/{attempted} succeeded")]
    PartialFailure {
        succeeded: usize,
        attempted: usize,
        errors: Vec<String>,
    },
}

impl ZombiescanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a path traversal error.
    pub fn traversal(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PathTraversal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the scan can skip and continue).
    ///
    /// Environmental failures (unreadable files, vanished entries) are
    /// recoverable; caller mistakes and safety violations are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::PermissionDenied { .. }
                | Self::NotFound { .. }
                | Self::PartialFailure { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::PathTraversal { path, .. } => Some(path),
            Self::CrossDevice { path } => Some(path),
            Self::PermissionDenied { path } => Some(path),
            Self::NotFound { path } => Some(path),
            Self::NotADirectory { path } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for zombiescan results.
pub type ZombiescanResult<T> = Result<T, ZombiescanError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ZombiescanResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ZombiescanResult<T> {
        self.map_err(|e| ZombiescanError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = ZombiescanError::io(
            PathBuf::from("/test/file.js"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, ZombiescanError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/file.js")));
        assert!(err.to_string().contains("/test/file.js"));
    }

    #[test]
    fn test_traversal_is_fatal() {
        let err = ZombiescanError::traversal("/tmp/../../etc/passwd", "escapes base");
        assert!(!err.is_recoverable());
        assert!(err.path().is_some());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ZombiescanError::PermissionDenied {
            path: PathBuf::from("/locked")
        }
        .is_recoverable());
        assert!(ZombiescanError::NotFound {
            path: PathBuf::from("/gone")
        }
        .is_recoverable());
        assert!(!ZombiescanError::InvalidBackupId {
            id: "xyz".to_string()
        }
        .is_recoverable());
        assert!(!ZombiescanError::invalid_argument("bad depth").is_recoverable());
    }

    #[test]
    fn test_partial_failure_display() {
        let err = ZombiescanError::PartialFailure {
            succeeded: 2,
            attempted: 5,
            errors: vec!["a".into(), "b".into()],
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("2/5"));
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let zombiescan_result = result.with_path("/missing/file.js");
        assert!(zombiescan_result.is_err());
    }
}

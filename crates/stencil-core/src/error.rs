//! Error types and handling for rendering operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Stencil operations
#[derive(Debug, Error)]
pub enum StencilError {
    /// The tree contradicts itself: a node reports incompatible
    /// classifications or carries trivia that does not belong to it
    #[error("Structural error: {message}")]
    Structural { message: String },

    /// The output sink refused a write
    #[error("Output error: {source}")]
    Output {
        #[source]
        source: std::io::Error,
    },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A syntax tree or configuration document could not be (de)serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Output,
    Io,
    Config,
    Serialization,
    Internal,
}

impl StencilError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StencilError::Structural { .. } => ErrorKind::Structural,
            StencilError::Output { .. } => ErrorKind::Output,
            StencilError::IoError { .. } => ErrorKind::Io,
            StencilError::ConfigError { .. } => ErrorKind::Config,
            StencilError::Serialization { .. } => ErrorKind::Serialization,
            StencilError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the caller may move on to the next tree)
    ///
    /// A render that failed half-way never is: its output is already partial.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Io | ErrorKind::Config | ErrorKind::Serialization
        )
    }

    /// Create a structural error
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an output error from a failed sink write
    pub fn output(source: std::io::Error) -> Self {
        Self::Output { source }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for StencilError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for StencilError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            StencilError::structural("raw text cannot be a container").kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            StencilError::config_error("bad value").kind(),
            ErrorKind::Config
        );
        assert_eq!(
            StencilError::output(std::io::Error::from(std::io::ErrorKind::BrokenPipe)).kind(),
            ErrorKind::Output
        );
    }

    #[test]
    fn test_structural_errors_are_fatal() {
        assert!(!StencilError::structural("contradiction").is_recoverable());
        assert!(!StencilError::internal_error("oops").is_recoverable());
        assert!(StencilError::config_error("missing").is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = StencilError::structural("node is both raw text and a container");
        assert_eq!(
            err.to_string(),
            "Structural error: node is both raw text and a container"
        );

        let err = StencilError::io_error(
            "tree.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("tree.json"));
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for the treemerge library.
///
/// Filesystem failures met while walking the project or writing the merged
/// document are logged and counted instead of being returned; only the
/// variants below abort a run.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// A required configuration field is absent.
    #[error("Missing configuration field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// A configuration value has the wrong shape.
    #[error("Configuration field '{field}' must be {expected}, found {found}")]
    ConfigType {
        /// Name of the offending field
        field: String,
        /// Description of the expected shape
        expected: &'static str,
        /// Description of the value actually found
        found: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a configuration type error.
    #[must_use]
    pub fn config_type(
        field: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::ConfigType {
            field: field.into(),
            expected,
            found: found.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this error comes from configuration loading or validation.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::MissingField { .. } | Self::ConfigType { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test message");
        assert!(err.is_config());
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/out", io_err);
        assert!(err.is_io());
        assert!(err.to_string().contains("/tmp/out"));
    }

    #[test]
    fn test_config_type_error_names_field() {
        let err = Error::config_type("skip_files", "an array of strings", "a number");
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Configuration field 'skip_files' must be an array of strings, found a number"
        );
    }

    #[test]
    fn test_missing_field_error() {
        let err = Error::missing_field("project_language");
        assert!(err.is_config());
        assert!(err.to_string().contains("project_language"));
    }

    #[test]
    fn test_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }
}

//! Error types for the mentor-rs library.
//!
//! Every fallible library operation returns [`Result`], whose error side is the
//! structured [`MentorError`]. The analyzers themselves never surface these to
//! report consumers: a failed analysis degrades into a default report instead.

use std::io;

use thiserror::Error;

/// Main result type for mentor operations.
pub type Result<T> = std::result::Result<T, MentorError>;

/// Error type for all mentor operations.
#[derive(Error, Debug)]
pub enum MentorError {
    /// I/O related errors (file reads, config writes)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Parsing and language processing errors
    #[error("Parse error in {language}: {message}")]
    Parse {
        /// Programming language being parsed
        language: String,
        /// Error description
        message: String,
        /// File path where error occurred
        file_path: Option<String>,
        /// Line number (if available)
        line: Option<usize>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format being handled
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Unsupported language or operation
    #[error("Unsupported: {message}")]
    Unsupported {
        /// Error description
        message: String,
    },
}

impl MentorError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new parse error
    pub fn parse(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: None,
            line: None,
        }
    }

    /// Create a new parse error with file context
    pub fn parse_with_location(
        language: impl Into<String>,
        message: impl Into<String>,
        file_path: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: Some(file_path.into()),
            line,
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error naming the offending field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Io { message, .. } | Self::Config { message, .. } => {
                *message = format!("{}: {message}", context.into());
            }
            _ => {}
        }
        self
    }
}

impl From<io::Error> for MentorError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for MentorError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<globset::Error> for MentorError {
    fn from(err: globset::Error) -> Self {
        Self::config(format!("Invalid glob pattern: {err}"))
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<MentorError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MentorError::config("Invalid configuration");
        assert!(matches!(err, MentorError::Config { .. }));

        let err = MentorError::parse("python", "Syntax error");
        assert!(matches!(err, MentorError::Parse { .. }));
    }

    #[test]
    fn test_config_error_with_context() {
        let err = MentorError::config("max_words must be positive").with_context("Loading .mentor.yml");
        assert_eq!(
            err.to_string(),
            "Configuration error: Loading .mentor.yml: max_words must be positive"
        );

        let err = MentorError::unsupported("cobol").with_context("ignored");
        assert_eq!(err.to_string(), "Unsupported: cobol");
    }

    #[test]
    fn test_io_context_prefixes_message() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));

        let err = result.context("Failed to read source").unwrap_err();
        if let MentorError::Io { message, source } = err {
            assert_eq!(message, "Failed to read source: I/O operation failed");
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        } else {
            panic!("Expected Io error");
        }
    }

    #[test]
    fn test_config_field_error() {
        let err = MentorError::config_field("Invalid value", "review.max_words");

        if let MentorError::Config { message, field } = err {
            assert_eq!(message, "Invalid value");
            assert_eq!(field, Some("review.max_words".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_parse_with_location_display() {
        let err = MentorError::parse_with_location("python", "Unexpected token", "a.py", Some(3));
        let display = err.to_string();
        assert!(display.contains("Parse error in python"));
        assert!(display.contains("Unexpected token"));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: MentorError = yaml_err.into();

        if let MentorError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("YAML".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }

    #[test]
    fn test_from_glob_error() {
        let glob_err = globset::Glob::new("a[").unwrap_err();
        let err: MentorError = glob_err.into();
        assert!(matches!(err, MentorError::Config { .. }));
    }

    #[test]
    fn test_with_context_leaves_unsupported_untouched() {
        let err = MentorError::unsupported("cobol").with_context("ignored");
        assert_eq!(err.to_string(), "Unsupported: cobol");
    }
}

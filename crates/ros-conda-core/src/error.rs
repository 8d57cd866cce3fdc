//! Error types for the core library

use thiserror::Error;

/// Core error type for ros-conda operations
#[derive(Error, Debug)]
pub enum Error {
    /// A distribution, index, manifest or template could not be found
    #[error("{what} not found: {reason}")]
    NotFound { what: String, reason: String },

    /// The manifest declares a build type without a script template
    #[error("Unsupported build type: {build_type}")]
    UnsupportedBuildType { build_type: String },

    /// Tag and version disagree
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    /// The dependency mapping table is missing or malformed
    #[error("Invalid mapping data: {reason}")]
    MappingData { reason: String },

    /// Manifest or condition parse error
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type alias for ros-conda operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Add context to an error
    pub fn context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext { context: context.into(), source: Box::new(source) }
    }

    /// Create a not found error
    pub fn not_found(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound { what: what.into(), reason: reason.into() }
    }

    /// Create an unsupported build type error
    pub fn unsupported_build_type(build_type: impl Into<String>) -> Self {
        Self::UnsupportedBuildType { build_type: build_type.into() }
    }

    /// Create a mapping data error
    pub fn mapping_data(reason: impl Into<String>) -> Self {
        Self::MappingData { reason: reason.into() }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Check if the error reports a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

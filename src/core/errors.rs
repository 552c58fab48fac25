use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the orchestrator.
///
/// Errors raised by a caller-supplied component action never pass through
/// this type; the executor hands them back untouched.
#[derive(Debug, Error)]
pub enum StagehandError {
    /// The dependency solver could not order the components
    #[error("Dependency resolution failed: {message}")]
    Dependency {
        message: String,
        /// Components involved in the failure, sorted by name
        components: Vec<String>,
    },

    /// A host path could not be turned into an absolute path
    #[error("Failed to resolve path {path:?}: {message}")]
    PathResolution {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// IO errors
    #[error("IO operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StagehandError {
    /// Create a dependency error
    pub fn dependency<S: Into<String>>(message: S) -> Self {
        Self::Dependency {
            message: message.into(),
            components: Vec::new(),
        }
    }

    /// Create a dependency error for components that link to each other in a loop
    pub fn cycle<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut components: Vec<String> = components.into_iter().map(Into::into).collect();
        components.sort();
        Self::Dependency {
            message: format!("circular dependency between {}", components.join(", ")),
            components,
        }
    }

    /// Create a path resolution error
    pub fn path_resolution<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::PathResolution {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a path resolution error with source
    pub fn path_resolution_with_source<P: Into<PathBuf>, S: Into<String>>(
        path: P,
        message: S,
        source: std::io::Error,
    ) -> Self {
        Self::PathResolution {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Create a configuration error with field
    pub fn configuration_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an IO error
    pub fn io<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Dependency { .. } => "dependency",
            Self::PathResolution { .. } => "path_resolution",
            Self::Configuration { .. } => "configuration",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, StagehandError>;

impl From<std::io::Error> for StagehandError {
    fn from(err: std::io::Error) -> Self {
        Self::io("io_operation", err)
    }
}

impl From<serde_json::Error> for StagehandError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("json", err)
    }
}

impl From<serde_yaml::Error> for StagehandError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization("yaml", err)
    }
}

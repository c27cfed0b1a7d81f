//! Core error types for the cascade resolver

use thiserror::Error;

/// Result type alias for cascade operations
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Coarse classification of a [`CascadeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidConfiguration,
    SecurityViolation,
    Unavailable,
    Initialization,
    Internal,
}

/// Main error type for the cascade resolver
#[derive(Error, Debug, Clone)]
pub enum CascadeError {
    /// No candidate file exists; `attempted` lists every canonical identifier tried
    #[error("Configuration not found: {message}")]
    NotFound {
        message: String,
        attempted: Vec<String>,
    },

    /// The file exists but could not be parsed or failed the strict schema
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// A coordinate segment does not match its naming rules
    #[error("Invalid {field}: {message}")]
    InvalidIdentifier {
        field: String,
        value: String,
        message: String,
    },

    /// Dangerous characters or an escape from the configuration root
    #[error("Security violation: {message}")]
    SecurityViolation {
        message: String,
        field: Option<String>,
    },

    /// Shared tier is unreachable, timed out, or rejected a command
    #[error("Shared tier unavailable: {message}")]
    Unavailable { message: String },

    /// Engine lifecycle failure
    #[error("Initialization error: {message}")]
    Initialization {
        message: String,
        #[source]
        source: Option<Box<CascadeError>>,
    },

    /// Engine settings could not be loaded or are out of range
    #[error("Settings error: {message}")]
    Settings {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },
}

impl CascadeError {
    /// Classify this error into the resolver's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidConfiguration { .. } | Self::InvalidIdentifier { .. } => {
                ErrorKind::InvalidConfiguration
            }
            Self::SecurityViolation { .. } => ErrorKind::SecurityViolation,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::Initialization { .. } => ErrorKind::Initialization,
            Self::Settings { .. } | Self::Io { .. } => ErrorKind::Internal,
        }
    }

    /// Whether the error must abort the current request.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::Unavailable
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_security_violation(&self) -> bool {
        self.kind() == ErrorKind::SecurityViolation
    }
}

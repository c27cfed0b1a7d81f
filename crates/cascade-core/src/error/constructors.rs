//! Constructor methods for CascadeError

use super::types::CascadeError;

impl CascadeError {
    /// Create a not-found error listing the attempted identifiers
    pub fn not_found(message: impl Into<String>, attempted: Vec<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            attempted,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an invalid configuration error pointing at a file
    pub fn invalid_configuration_at(
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create an identifier format error
    pub fn invalid_identifier(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidIdentifier {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a security violation
    pub fn security_violation(message: impl Into<String>) -> Self {
        Self::SecurityViolation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a security violation attributed to a coordinate field
    pub fn security_violation_in(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecurityViolation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a shared tier unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an initialization error
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
            source: None,
        }
    }

    /// Create an initialization error wrapping its cause
    pub fn initialization_caused_by(message: impl Into<String>, source: CascadeError) -> Self {
        Self::Initialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
            context: None,
        }
    }

    /// Create a settings error with context
    pub fn settings_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            CascadeError::not_found("x", vec![]).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CascadeError::invalid_identifier("module", "Hrkg", "bad").kind(),
            ErrorKind::InvalidConfiguration
        );
        assert_eq!(
            CascadeError::security_violation("escape").kind(),
            ErrorKind::SecurityViolation
        );
        assert_eq!(
            CascadeError::unavailable("down").kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn test_only_unavailable_is_non_fatal() {
        assert!(!CascadeError::unavailable("down").is_fatal());
        assert!(CascadeError::invalid_configuration("bad").is_fatal());
        assert!(CascadeError::initialization("missing base").is_fatal());
    }

    #[test]
    fn test_display_includes_field() {
        let err = CascadeError::invalid_identifier("profile", "X", "must be lowercase");
        assert_eq!(err.to_string(), "Invalid profile: must be lowercase");
    }
}

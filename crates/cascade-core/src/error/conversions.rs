//! From trait implementations for CascadeError conversions

use super::types::CascadeError;

impl From<std::io::Error> for CascadeError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

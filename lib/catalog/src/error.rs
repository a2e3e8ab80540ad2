//! Error types for the catalog crate.

use std::fmt;

/// Errors from catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested record does not exist.
    NotFound { kind: &'static str, id: String },
    /// A field failed validation.
    Invalid { field: &'static str, reason: String },
    /// The backing store failed.
    Store { details: String },
}

impl CatalogError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn store(details: impl fmt::Display) -> Self {
        Self::Store {
            details: details.to_string(),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} '{id}' not found"),
            Self::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::Store { details } => write!(f, "catalog store error: {details}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = CatalogError::NotFound {
            kind: "event",
            id: "evt_1".to_string(),
        };
        assert_eq!(err.to_string(), "event 'evt_1' not found");
    }

    #[test]
    fn invalid_display() {
        let err = CatalogError::invalid("name", "must not be empty");
        assert_eq!(err.to_string(), "invalid name: must not be empty");
    }
}

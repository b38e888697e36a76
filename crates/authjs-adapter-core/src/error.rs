// Typed data-client errors.
//
// Data clients report failures as one of a small set of kinds instead of an
// opaque provider string. Adapters match on the kind; provider codes only
// exist at the edge (`from_code` when decoding, `code` when reporting).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider code for "an operation failed because it depends on one or more
/// records that were required but not found".
pub const RECORD_NOT_FOUND_CODE: &str = "P2025";

/// Provider code for "unique constraint failed".
pub const UNIQUE_CONSTRAINT_CODE: &str = "P2002";

/// Provider code for "can't reach database server".
pub const CONNECTION_CODE: &str = "P1001";

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientErrorKind {
    RecordNotFound,
    Connection,
    ConstraintViolation,
    Unknown,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RecordNotFound => "record not found",
            Self::Connection => "connection error",
            Self::ConstraintViolation => "constraint violation",
            Self::Unknown => "unknown error",
        };
        write!(f, "{name}")
    }
}

/// Error returned by every data-client operation.
///
/// Adapters propagate these unchanged, with one exception: a verification
/// token delete that reports [`ClientError::RecordNotFound`] is treated as
/// an already-consumed token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// An update or delete predicate matched no record.
    #[error("Record not found: {message}")]
    RecordNotFound { message: String },

    /// The backing store could not be reached.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// A unique or foreign-key constraint rejected the write.
    #[error("Constraint violation on `{target}`: {message}")]
    ConstraintViolation { message: String, target: String },

    /// Anything the client could not classify.
    #[error("Unknown client error{}: {message}", code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    Unknown {
        code: Option<String>,
        message: String,
    },
}

impl ClientError {
    pub fn record_not_found(message: impl Into<String>) -> Self {
        Self::RecordNotFound {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn constraint_violation(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            message: message.into(),
            target: target.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            code: None,
            message: message.into(),
        }
    }

    /// Classify a provider error code.
    ///
    /// ```
    /// use authjs_adapter_core::error::{ClientError, ClientErrorKind};
    ///
    /// let err = ClientError::from_code("P2025", "No VerificationToken found");
    /// assert_eq!(err.kind(), ClientErrorKind::RecordNotFound);
    /// ```
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            RECORD_NOT_FOUND_CODE => Self::RecordNotFound { message },
            "P1001" | "P1002" | "P1008" | "P1017" => Self::Connection { message },
            UNIQUE_CONSTRAINT_CODE | "P2003" | "P2014" => Self::ConstraintViolation {
                message,
                target: String::new(),
            },
            other => Self::Unknown {
                code: Some(other.to_string()),
                message,
            },
        }
    }

    pub fn kind(&self) -> ClientErrorKind {
        match self {
            Self::RecordNotFound { .. } => ClientErrorKind::RecordNotFound,
            Self::Connection { .. } => ClientErrorKind::Connection,
            Self::ConstraintViolation { .. } => ClientErrorKind::ConstraintViolation,
            Self::Unknown { .. } => ClientErrorKind::Unknown,
        }
    }

    /// Canonical provider code for this error, if one is known.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::RecordNotFound { .. } => Some(RECORD_NOT_FOUND_CODE),
            Self::Connection { .. } => Some(CONNECTION_CODE),
            Self::ConstraintViolation { .. } => Some(UNIQUE_CONSTRAINT_CODE),
            Self::Unknown { code, .. } => code.as_deref(),
        }
    }

    pub fn is_record_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}

/// Result type for data-client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_record_not_found() {
        let err = ClientError::from_code("P2025", "Record to delete does not exist.");
        assert!(err.is_record_not_found());
        assert_eq!(err.code(), Some("P2025"));
    }

    #[test]
    fn test_from_code_connection() {
        for code in ["P1001", "P1002", "P1008", "P1017"] {
            let err = ClientError::from_code(code, "server closed the connection");
            assert_eq!(err.kind(), ClientErrorKind::Connection, "code {code}");
            assert!(!err.is_record_not_found());
        }
    }

    #[test]
    fn test_from_code_constraint() {
        for code in ["P2002", "P2003", "P2014"] {
            let err = ClientError::from_code(code, "constraint failed");
            assert_eq!(err.kind(), ClientErrorKind::ConstraintViolation, "code {code}");
        }
    }

    #[test]
    fn test_from_code_unknown_keeps_code() {
        let err = ClientError::from_code("P9999", "something odd");
        assert_eq!(err.kind(), ClientErrorKind::Unknown);
        assert_eq!(err.code(), Some("P9999"));
        assert_eq!(err.to_string(), "Unknown client error (P9999): something odd");
    }

    #[test]
    fn test_unknown_without_code_display() {
        let err = ClientError::unknown("boom");
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "Unknown client error: boom");
    }

    #[test]
    fn test_constraint_display() {
        let err = ClientError::constraint_violation("email", "already taken");
        assert_eq!(err.to_string(), "Constraint violation on `email`: already taken");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ClientErrorKind::RecordNotFound.to_string(), "record not found");
        assert_eq!(ClientErrorKind::Connection.to_string(), "connection error");
    }
}

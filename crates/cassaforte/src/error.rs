//! Error types for cassaforte

use std::time::Duration;
use thiserror::Error;

/// Result type alias for cassaforte operations
pub type CqlResult<T> = Result<T, CqlError>;

/// Reasons a schema object name is refused by the statement builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The name is empty or only whitespace.
    #[error("Keyspace name must not be empty")]
    EmptyName,

    /// The name is not a valid unquoted or double-quoted identifier.
    #[error("The keyspace name '{name}' is not a valid identifier")]
    InvalidName { name: String },

    /// The name collides with a reserved keyword.
    #[error("The keyspace name '{keyword}' is not allowed because it is a reserved keyword")]
    ReservedKeyword { keyword: String },

    /// ALTER KEYSPACE was built without any option to change.
    #[error("ALTER KEYSPACE {name} requires at least one option")]
    MissingOptions { name: String },
}

/// Category of an error reported by the remote server.
///
/// Mirrors the error codes of the native protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    ServerError,
    ProtocolError,
    BadCredentials,
    Unavailable,
    Overloaded,
    IsBootstrapping,
    TruncateError,
    WriteTimeout,
    ReadTimeout,
    SyntaxError,
    Unauthorized,
    Invalid,
    ConfigError,
    AlreadyExists,
    Unprepared,
    Unknown,
}

impl ServerErrorKind {
    /// Classify a native protocol error code.
    pub fn from_code(code: i32) -> Self {
        match code {
            0x0000 => Self::ServerError,
            0x000A => Self::ProtocolError,
            0x0100 => Self::BadCredentials,
            0x1000 => Self::Unavailable,
            0x1001 => Self::Overloaded,
            0x1002 => Self::IsBootstrapping,
            0x1003 => Self::TruncateError,
            0x1100 => Self::WriteTimeout,
            0x1200 => Self::ReadTimeout,
            0x2000 => Self::SyntaxError,
            0x2100 => Self::Unauthorized,
            0x2200 => Self::Invalid,
            0x2300 => Self::ConfigError,
            0x2400 => Self::AlreadyExists,
            0x2500 => Self::Unprepared,
            _ => Self::Unknown,
        }
    }

    /// Whether the server gave up waiting on replicas.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WriteTimeout | Self::ReadTimeout)
    }
}

/// Error types for cassaforte operations
#[derive(Debug, Error)]
pub enum CqlError {
    /// A statement failed local validation before any text was produced
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A builder was used in an invalid order
    #[error("State error: {0}")]
    State(String),

    /// Value encoding/decoding error
    #[error("Codec error for type '{type_name}': {message}")]
    Codec { type_name: String, message: String },

    /// Error reported by the remote server
    #[error("Server error {code:#06x} ({kind:?}): {message}")]
    Server {
        kind: ServerErrorKind,
        code: i32,
        message: String,
    },

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection-level failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement timeout error
    #[error("Statement timeout after {0:?}")]
    Timeout(Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CqlError {
    /// Create a codec error for a specific wire type
    pub fn codec(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Codec {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Map a native protocol error code and message into a `CqlError`
    pub fn from_server_error(code: i32, message: impl Into<String>) -> Self {
        Self::Server {
            kind: ServerErrorKind::from_code(code),
            code,
            message: message.into(),
        }
    }

    /// The validation failure, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this is a local validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a state error
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }

    /// Check if the server refused to create an object that already exists
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::Server {
                kind: ServerErrorKind::AlreadyExists,
                ..
            }
        )
    }

    /// Check if this is a local or server-side timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Server { kind, .. } => kind.is_timeout(),
            _ => false,
        }
    }
}

impl From<url::ParseError> for CqlError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for CqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_codes_map_to_kinds() {
        let err = CqlError::from_server_error(0x2400, "Keyspace app already exists");
        assert!(err.is_already_exists());
        assert!(!err.is_timeout());

        let err = CqlError::from_server_error(0x1100, "Operation timed out");
        assert!(err.is_timeout());

        assert_eq!(ServerErrorKind::from_code(0x7777), ServerErrorKind::Unknown);
    }

    #[test]
    fn server_error_display_includes_hex_code() {
        let err = CqlError::from_server_error(0x2000, "line 1:0 no viable alternative");
        assert_eq!(
            err.to_string(),
            "Server error 0x2000 (SyntaxError): line 1:0 no viable alternative"
        );
    }

    #[test]
    fn validation_error_converts() {
        let err: CqlError = ValidationError::ReservedKeyword {
            keyword: "select".into(),
        }
        .into();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation error: The keyspace name 'select' is not allowed because it is a reserved keyword"
        );
    }
}

//! # Check Errors
//!
//! One enum per stage. `ProbeError` collects them for the report; every
//! variant ends in an UNKNOWN status.

use crate::logging::codes::{self, Code};

/// Rejected command line input, detected before any network I/O
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("too many attributes ({requested}), maximum is {max}")]
    TooManyAttributes { max: usize, requested: usize },

    #[error("no attributes given")]
    NoAttributes,

    #[error("wrong filter format '{filter}', expected <type>:<property>:<value>")]
    MalformedFilter { filter: String },

    #[error("filters can only be used with class queries")]
    FilterRequiresClassQuery,

    #[error("invalid expect pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unsupported TLS version '{value}', use 1.1 or 1.2")]
    InvalidTlsVersion { value: String },

    #[error("unknown query type '{value}', use class or dn")]
    InvalidQueryMode { value: String },
}

impl ArgumentError {
    pub fn code(&self) -> Code {
        match self {
            ArgumentError::TooManyAttributes { .. } => codes::arguments::TOO_MANY_ATTRIBUTES,
            ArgumentError::NoAttributes => codes::arguments::NO_ATTRIBUTES,
            ArgumentError::MalformedFilter { .. } => codes::arguments::MALFORMED_FILTER,
            ArgumentError::FilterRequiresClassQuery => codes::arguments::FILTER_WITH_PATH_QUERY,
            ArgumentError::InvalidPattern { .. } => codes::arguments::INVALID_PATTERN,
            ArgumentError::InvalidTlsVersion { .. } | ArgumentError::InvalidQueryMode { .. } => {
                codes::arguments::INVALID_OPTION_VALUE
            }
        }
    }
}

/// HTTP level failure talking to the controller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("cannot create HTTP client: {reason}")]
    ClientBuild { reason: String },

    #[error("connection refused by {endpoint}")]
    ConnectionRefused { endpoint: String },

    #[error("connection reset by {endpoint}, try another TLS version")]
    ConnectionReset { endpoint: String },

    #[error("remote closed connection ({endpoint}), try another TLS version")]
    ConnectionClosed { endpoint: String },

    #[error("TLS handshake with {endpoint} failed: {reason}")]
    Handshake { endpoint: String, reason: String },

    #[error("request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    #[error("cannot read response body: {reason}")]
    Body { reason: String },
}

impl TransportError {
    pub fn code(&self) -> Code {
        match self {
            TransportError::ClientBuild { .. } => codes::transport::CLIENT_BUILD_FAILURE,
            TransportError::ConnectionRefused { .. } => codes::transport::CONNECTION_REFUSED,
            TransportError::ConnectionReset { .. } => codes::transport::CONNECTION_RESET,
            TransportError::ConnectionClosed { .. } => codes::transport::CONNECTION_CLOSED,
            TransportError::Handshake { .. } => codes::transport::HANDSHAKE_FAILURE,
            TransportError::Request { .. } | TransportError::Body { .. } => {
                codes::transport::REQUEST_FAILED
            }
        }
    }

    /// Failures that a different TLS ceiling may avoid
    pub fn suggests_tls_change(&self) -> bool {
        matches!(
            self,
            TransportError::ConnectionReset { .. }
                | TransportError::ConnectionClosed { .. }
                | TransportError::Handshake { .. }
        )
    }
}

/// Response body that could not be understood
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty response (EOF), controller may not accept this TLS version")]
    EmptyResponse,

    #[error("cannot parse response: {reason}")]
    Malformed { reason: String },
}

/// Request document could not be written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot build request document: {reason}")]
pub struct DocumentError {
    pub reason: String,
}

impl DocumentError {
    pub fn new(reason: impl ToString) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// Login failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("aaaLogin error: {description} ({code})")]
    Rejected { code: String, description: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("aaaLogin response: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Query failure after a successful login
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Any failure that keeps a check from producing a verdict
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ProbeError {
    /// Plugin exit code, always UNKNOWN
    pub fn exit_code(&self) -> i32 {
        3
    }

    /// Log code for this failure
    pub fn code(&self) -> Code {
        match self {
            ProbeError::Argument(e) => e.code(),
            ProbeError::Auth(AuthError::Rejected { .. }) => codes::session::LOGIN_REJECTED,
            ProbeError::Auth(AuthError::Transport(e)) | ProbeError::Transport(e) => e.code(),
            ProbeError::Auth(_) => codes::session::LOGIN_RESPONSE_INVALID,
            ProbeError::Query(_) => codes::session::QUERY_FAILED,
        }
    }

    /// Message shown after the `UNKNOWN - ` prefix
    pub fn user_message(&self) -> String {
        match self {
            ProbeError::Argument(e) => e.to_string(),
            ProbeError::Auth(AuthError::Transport(e)) | ProbeError::Transport(e) => {
                format!("aaaLogin: {}", e)
            }
            ProbeError::Auth(e) => e.to_string(),
            ProbeError::Query(e) => format!("query: {}", e),
        }
    }
}

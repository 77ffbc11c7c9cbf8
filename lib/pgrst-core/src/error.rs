//! Error types for pgrst.

use derive_more::{Display, Error, From};

use crate::DbResponse;

// ============================================================================
// Transport Error
// ============================================================================

/// Failure inside the HTTP transport, before any response was classified.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    Timeout,

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for pgrst operations.
///
/// A `409 Conflict` answer is deliberately absent: it is reported through
/// the outcome's structured error record, not as an `Error`.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The input payload could not be serialized to JSON.
    #[display("exec: failed to serialize input: {_0}")]
    #[from]
    Serialization(serde_json::Error),

    /// The bearer token could not be produced.
    #[display("token signing error: {_0}")]
    #[from(skip)]
    Signing(#[error(not(source))] String),

    /// The transport failed (connection, TLS, timeout).
    #[display("exec: request error -> {_0}")]
    #[from]
    Transport(TransportError),

    /// A read was executed without an output destination.
    #[display("exec: no output destination specified for SELECT")]
    #[from(skip)]
    MissingOutput,

    /// No verb was selected on the builder.
    #[display("exec: SELECT, INSERT, UPSERT, UPDATE or DELETE not specified")]
    #[from(skip)]
    NoVerbSelected,

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    Decode {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// The response was successful but its body did not fit the destination.
    #[display("error setting output: {_0}")]
    #[from(skip)]
    OutputBinding(Box<Error>),

    /// The API answered with a failure status other than `409 Conflict`.
    #[display("exec: error completing request -> {_0}")]
    #[from(skip)]
    Request(#[error(not(source))] DbResponse),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Transport(TransportError::Connection(message.into()))
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Transport(TransportError::Tls(message.into()))
    }

    /// Create a timeout error.
    #[must_use]
    pub const fn timeout() -> Self {
        Self::Transport(TransportError::Timeout)
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::Transport(TransportError::InvalidRequest(message.into()))
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap a decode failure raised while binding a successful response.
    #[must_use]
    pub fn output_binding(source: Self) -> Self {
        Self::OutputBinding(Box::new(source))
    }

    /// Returns `true` if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout))
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Connection(_)))
    }

    /// Returns the structured error record of a failed request.
    #[must_use]
    pub const fn db_response(&self) -> Option<&DbResponse> {
        match self {
            Self::Request(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status code of a failed request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.db_response().map(|response| response.http_status_code)
    }
}

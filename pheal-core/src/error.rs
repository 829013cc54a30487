//! # Errors
//!
//! Errors follow the classic database driver taxonomy:
//!
//! - **[`InterfaceError`]**: Problems on the client side of the protocol, e.g. the HTTP request
//!   could not be sent, the server answered with a non-success status that carried no
//!   decodable error, or the response envelope had an unexpected type.
//! - **[`DatabaseError`]**: An error reported by the query server, classified by its SQL state
//!   into a [`DatabaseErrorKind`].
//!
//! Both are gathered in [`Error`], the error type of every fallible operation of this crate.
use crate::BoxError;
use http::StatusCode;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Interface(#[from] InterfaceError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl Error {
    /// Returns the server error if this is a statement error, the kind of error raised for
    /// invalid SQL or references to unknown tables and columns.
    pub fn as_statement_error(&self) -> Option<&DatabaseError> {
        match self {
            Error::Database(err) if err.kind == DatabaseErrorKind::Programming => Some(err),
            _ => None,
        }
    }
}

impl From<prost::DecodeError> for Error {
    fn from(source: prost::DecodeError) -> Self {
        Error::Interface(InterfaceError::Decode(source))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    #[error("Invalid query server URL '{0}': {1}")]
    InvalidUrl(String, String),
    #[error("Failed to build the HTTP client: '{0}'")]
    HttpClient(#[source] reqwest::Error),
    #[error("RPC request failed: '{0}'")]
    RequestFailed(#[source] BoxError),
    #[error("RPC request returned invalid status code {0}")]
    InvalidStatus(StatusCode),
    #[error("Unexpected response type \"{0}\"")]
    UnexpectedResponseType(String),
    #[error("Failed to decode protobuf message: '{0}'")]
    Decode(#[source] prost::DecodeError),
    #[error("The server returned an empty result for an execute request")]
    EmptyResult,
    #[error("Unsupported parameter value: {0}")]
    UnsupportedParameter(serde_json::Value),
    #[error("The connection is already closed")]
    ConnectionClosed,
    #[error("The cursor is already closed")]
    CursorClosed,
}

/// An error reported by the query server.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct DatabaseError {
    pub kind: DatabaseErrorKind,
    /// Human readable description.
    pub message: String,
    /// Vendor error code, e.g. `504` for Phoenix' undefined column.
    pub code: Option<u32>,
    /// Five character SQL state, e.g. `42703`.
    pub sql_state: Option<String>,
    /// Status of the HTTP response that carried the error.
    pub http_status: Option<StatusCode>,
}

impl DatabaseError {
    /// Builds an error classified by its SQL state.
    pub fn new(message: impl Into<String>, code: Option<u32>, sql_state: Option<String>) -> Self {
        let kind = sql_state
            .as_deref()
            .map(DatabaseErrorKind::from_sql_state)
            .unwrap_or(DatabaseErrorKind::Internal);

        Self {
            kind,
            message: message.into(),
            code,
            sql_state,
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: StatusCode) -> Self {
        self.http_status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseErrorKind {
    /// Connection problems and errors during execution.
    Operational,
    /// Constraint violations.
    Integrity,
    /// Invalid data, e.g. a division by zero or a value out of range.
    Data,
    /// Invalid cursor or transaction state, and anything unclassified.
    Internal,
    /// Syntax errors and access rule violations, e.g. an undefined column.
    Programming,
}

// Order matters: `22018` must win over `22`.
const SQL_STATE_CLASSES: &[(&str, DatabaseErrorKind)] = &[
    ("08", DatabaseErrorKind::Operational),
    ("22018", DatabaseErrorKind::Integrity),
    ("22", DatabaseErrorKind::Data),
    ("23", DatabaseErrorKind::Integrity),
    ("24", DatabaseErrorKind::Internal),
    ("25", DatabaseErrorKind::Internal),
    ("42", DatabaseErrorKind::Programming),
    ("XLC", DatabaseErrorKind::Operational),
    ("INT", DatabaseErrorKind::Internal),
];

impl DatabaseErrorKind {
    pub fn from_sql_state(sql_state: &str) -> Self {
        SQL_STATE_CLASSES
            .iter()
            .find(|(prefix, _)| sql_state.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(DatabaseErrorKind::Internal)
    }
}

impl fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatabaseErrorKind::Operational => "Operational error",
            DatabaseErrorKind::Integrity => "Integrity error",
            DatabaseErrorKind::Data => "Data error",
            DatabaseErrorKind::Internal => "Internal error",
            DatabaseErrorKind::Programming => "Programming error",
        };
        f.write_str(name)
    }
}

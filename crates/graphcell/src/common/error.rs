//! Common Error Types
//!
//! One error enum per failure kind, plus a top-level [`Error`] that maps each
//! kind to a stable [`ErrorCode`] (and from there to a process exit code).

use thiserror::Error;

/// Stable error classification.
///
/// The numeric value is the exit code used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Config = 2,
    Auth = 3,
    Read = 4,
    Write = 5,
    NotFound = 6,
    Transport = 7,
}

impl ErrorCode {
    pub fn exit_code(&self) -> u8 {
        *self as u8
    }
}

/// Missing or invalid configuration. Always detected before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{key}` (env {env})")]
    Missing { key: &'static str, env: &'static str },

    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to read config file {path}: {message}")]
    File { path: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// Token acquisition failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credential: {0}")]
    MissingCredentials(&'static str),

    #[error("identity provider rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("token request failed: {0}")]
    Transport(String),
}

/// Failures talking to the Graph API.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Graph API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// Failure of a single-cell read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("token unavailable: {0}")]
    Auth(#[from] AuthError),

    #[error("read failed: {0}")]
    Graph(#[from] GraphError),
}

/// Failure of a single-cell write.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("token unavailable: {0}")]
    Auth(#[from] AuthError),

    #[error("write failed: {0}")]
    Graph(#[from] GraphError),
}

/// Failure resolving a workbook, site or file.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("token unavailable: {0}")]
    Auth(#[from] AuthError),

    #[error("lookup failed: {0}")]
    Graph(#[from] GraphError),

    #[error("no item named '{0}' found in drive")]
    NotFound(String),
}

/// Any failure surfaced by the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl Error {
    /// Classify the error. Transport failures keep their own code regardless
    /// of which operation hit them.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Config(_) => ErrorCode::Config,
            Error::Auth(e) => auth_code(e),
            Error::Read(ReadError::Auth(e)) | Error::Write(WriteError::Auth(e)) => auth_code(e),
            Error::Read(ReadError::Graph(e)) => graph_code(e, ErrorCode::Read),
            Error::Write(WriteError::Graph(e)) => graph_code(e, ErrorCode::Write),
            Error::Resolve(ResolveError::Auth(e)) => auth_code(e),
            Error::Resolve(ResolveError::Graph(e)) => graph_code(e, ErrorCode::NotFound),
            Error::Resolve(ResolveError::NotFound(_)) => ErrorCode::NotFound,
            Error::Graph(e) => graph_code(e, ErrorCode::Read),
        }
    }
}

fn auth_code(err: &AuthError) -> ErrorCode {
    match err {
        AuthError::MissingCredentials(_) => ErrorCode::Config,
        AuthError::Transport(_) => ErrorCode::Transport,
        _ => ErrorCode::Auth,
    }
}

fn graph_code(err: &GraphError, fallback: ErrorCode) -> ErrorCode {
    match err {
        GraphError::Transport(_) => ErrorCode::Transport,
        _ => fallback,
    }
}

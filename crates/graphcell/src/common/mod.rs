//! Common Utilities
//!
//! Shared types, error handling, and utility functions used across the crate.

pub mod error;
pub mod http;
pub mod paths;
pub mod result;

pub use error::{
    AuthError, ConfigError, Error, ErrorCode, GraphError, ReadError, ResolveError, WriteError,
};
pub use http::{create_http_client_with_timeout, DEFAULT_TIMEOUT_SECS};
pub use paths::{config_path, graphcell_dir};
pub use result::AppResult;

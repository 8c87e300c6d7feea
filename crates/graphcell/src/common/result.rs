//! Common Result Type
//!
//! Type alias for library results.

use super::error::Error;

/// Library result type
///
/// Uses the top-level [`Error`] so callers can ask for an [`ErrorCode`](super::ErrorCode).
pub type AppResult<T> = Result<T, Error>;

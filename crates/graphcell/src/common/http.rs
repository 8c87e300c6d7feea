//! HTTP Client Utilities
//!
//! Shared HTTP client creation with consistent configuration.

use std::time::Duration;

use super::error::GraphError;

/// Request timeout applied to every identity and Graph call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Create a reqwest HTTP client with custom timeout
pub fn create_http_client_with_timeout(timeout_secs: u64) -> Result<reqwest::Client, GraphError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(DEFAULT_TIMEOUT_SECS)))
        .build()?;
    Ok(client)
}

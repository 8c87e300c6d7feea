//! OAuth Provider Abstraction
//!
//! Trait-based provider system so the token cache does not care which
//! identity endpoint issues its tokens.

pub mod microsoft;

use super::credentials::Credentials;
use crate::common::AuthError;

/// Tokens returned from a client-credential exchange.
#[derive(Clone)]
pub struct OAuthTokens {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds, when the provider reports one.
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// OAuth provider trait.
///
/// Implementations perform exactly one token request per call and never cache.
#[allow(async_fn_in_trait)]
pub trait OAuthProvider {
    /// Provider name (e.g. "microsoft")
    fn name(&self) -> &str;

    /// Acquire an app-only token with the client-credential grant.
    async fn client_credentials(
        &self,
        credentials: &Credentials,
        scope: &str,
    ) -> Result<OAuthTokens, AuthError>;
}

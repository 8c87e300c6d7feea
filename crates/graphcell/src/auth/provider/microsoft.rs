//! Microsoft Identity Platform Provider
//!
//! Implements the OAuth2 client-credential grant against the v2.0 token
//! endpoint of Microsoft Entra ID.

use std::collections::HashMap;
use tracing::{error, info};

use super::{OAuthProvider, OAuthTokens};
use crate::auth::credentials::Credentials;
use crate::common::{create_http_client_with_timeout, AuthError};

// ── Microsoft identity endpoints ────────────────────────────────────────────

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Microsoft identity platform provider.
pub struct MicrosoftProvider {
    http: reqwest::Client,
    authority_host: String,
}

impl MicrosoftProvider {
    /// `authority_host` is [`DEFAULT_AUTHORITY_HOST`] outside sovereign clouds
    /// and tests.
    pub fn with_authority(authority_host: &str, timeout_secs: u64) -> Result<Self, AuthError> {
        let http = create_http_client_with_timeout(timeout_secs)
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            authority_host: authority_host.trim_end_matches('/').to_string(),
        })
    }

    /// `{authority}/{tenant}/oauth2/v2.0/token`
    pub fn token_endpoint(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host,
            urlencoding::encode(tenant_id)
        )
    }
}

impl OAuthProvider for MicrosoftProvider {
    fn name(&self) -> &str {
        "microsoft"
    }

    async fn client_credentials(
        &self,
        credentials: &Credentials,
        scope: &str,
    ) -> Result<OAuthTokens, AuthError> {
        info!("Requesting new token from Microsoft identity platform");

        let mut params = HashMap::new();
        params.insert("client_id", credentials.client_id.as_str());
        params.insert("client_secret", credentials.client_secret.as_str());
        params.insert("grant_type", "client_credentials");
        params.insert("scope", scope);

        let url = self.token_endpoint(&credentials.tenant_id);
        let (status, body) = self.post_form(&url, &params).await?;

        if !(200..300).contains(&status) {
            let message = error_description(&body);
            error!("Token request rejected (HTTP {}): {}", status, body);
            return Err(AuthError::Rejected { status, message });
        }

        parse_token_response(&body)
    }
}

// ── HTTP utilities ──────────────────────────────────────────────────────────

impl MicrosoftProvider {
    /// POST a form-encoded request and return status and body.
    ///
    /// Secrets travel in the request body only.
    async fn post_form(
        &self,
        url: &str,
        params: &HashMap<&str, &str>,
    ) -> Result<(u16, String), AuthError> {
        let response = self
            .http
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                error!("Token request failed: {}", e);
                AuthError::Transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(format!("failed to read response body: {}", e)))?;

        Ok((status, body))
    }
}

/// Pull `error_description` (or `error`) out of an error body.
fn error_description(body: &str) -> String {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.to_string(),
    };
    parsed
        .get("error_description")
        .or_else(|| parsed.get("error"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error")
        .to_string()
}

/// Parse a token endpoint response.
///
/// `expires_in` may be a number or a numeric string; when absent it is left
/// as `None` for the cache to apply its default.
fn parse_token_response(body: &str) -> Result<OAuthTokens, AuthError> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AuthError::InvalidResponse(format!("invalid JSON: {}", e)))?;

    if let Some(err) = parsed.get("error").and_then(|v| v.as_str()) {
        let desc = parsed
            .get("error_description")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error");
        return Err(AuthError::InvalidResponse(format!("{}: {}", err, desc)));
    }

    let access_token = parsed
        .get("access_token")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::InvalidResponse("missing access_token".to_string()))?
        .to_string();

    let token_type = parsed
        .get("token_type")
        .and_then(|v| v.as_str())
        .unwrap_or("Bearer")
        .to_string();

    let expires_in = parsed.get("expires_in").and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_str().and_then(|s| s.parse::<u64>().ok()))
    });

    Ok(OAuthTokens {
        access_token,
        token_type,
        expires_in,
    })
}

//! Token Cache
//!
//! Holds at most one app-only bearer token in memory and asks the identity
//! provider for a new one only when the cached token is missing or about to
//! expire. Nothing is persisted across process restarts.

pub mod credentials;
pub mod provider;

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub use self::credentials::Credentials;
use self::provider::microsoft::MicrosoftProvider;
pub use self::provider::{OAuthProvider, OAuthTokens};
use crate::common::{AuthError, ConfigError};
use crate::config::Config;

/// Tokens expiring within this many seconds are treated as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Lifetime assumed when the provider omits `expires_in`.
pub const DEFAULT_LIFETIME_SECS: u64 = 3599;

/// Default scope: everything granted to the app on Microsoft Graph.
pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

// ── Public types ────────────────────────────────────────────────────────────

/// A cached bearer token. Always carries its expiry.
#[derive(Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Usable at `now` with `margin_secs` to spare.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin_secs: i64) -> bool {
        now < self.expires_at - Duration::seconds(margin_secs)
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ── Token Provider ──────────────────────────────────────────────────────────

/// Owns the credentials and the single cached token.
///
/// The cache lock is held across a refresh, so concurrent callers that miss
/// at the same time share one token request.
pub struct TokenProvider<P = MicrosoftProvider> {
    provider: P,
    credentials: Credentials,
    scope: String,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider<MicrosoftProvider> {
    /// Build a provider for the Microsoft identity platform from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let provider = MicrosoftProvider::with_authority(config.authority_host(), config.timeout_secs())
            .map_err(|e| ConfigError::invalid("authority_host", e.to_string()))?;
        Ok(Self::new(provider, config.credentials(), config.scope()))
    }
}

impl<P: OAuthProvider> TokenProvider<P> {
    pub fn new(provider: P, credentials: Credentials, scope: impl Into<String>) -> Self {
        Self {
            provider,
            credentials,
            scope: scope.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Return a valid access token, requesting a new one if necessary.
    ///
    /// On failure the cache is left exactly as it was.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        self.credentials.validate().map_err(|e| {
            error!("Cannot request token: {}", e);
            e
        })?;

        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh_at(Utc::now(), EXPIRY_MARGIN_SECS) {
                debug!("Using cached token (expires {})", cached.expires_at.to_rfc3339());
                return Ok(cached.access_token.clone());
            }
            debug!("Cached token expiring at {}, refreshing", cached.expires_at.to_rfc3339());
        }

        let tokens = self
            .provider
            .client_credentials(&self.credentials, &self.scope)
            .await
            .map_err(|e| {
                error!("Token acquisition via {} failed: {}", self.provider.name(), e);
                e
            })?;

        let lifetime = tokens.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS);
        let entry = CachedToken {
            access_token: tokens.access_token,
            expires_at: expiry_after(Utc::now(), lifetime),
        };
        info!("Token cached until {}", entry.expires_at.to_rfc3339());

        let token = entry.access_token.clone();
        *cache = Some(entry);
        Ok(token)
    }

    /// Snapshot of the cache entry, if any.
    pub async fn cached(&self) -> Option<CachedToken> {
        self.cache.lock().await.clone()
    }
}

/// `now + lifetime`. A lifetime too large to represent falls back to
/// [`DEFAULT_LIFETIME_SECS`].
fn expiry_after(now: DateTime<Utc>, lifetime_secs: u64) -> DateTime<Utc> {
    let expiry = i64::try_from(lifetime_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime));

    match expiry {
        Some(at) => at,
        None => {
            warn!(
                "Token lifetime of {}s is out of range, assuming {}s",
                lifetime_secs, DEFAULT_LIFETIME_SECS
            );
            now + Duration::seconds(DEFAULT_LIFETIME_SECS as i64)
        }
    }
}

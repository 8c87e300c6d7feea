//! Client Credentials
//!
//! Tenant, client id and client secret for the client-credential grant.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::common::AuthError;

/// App registration credentials. Immutable for the life of the process.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    #[zeroize(skip)]
    pub tenant_id: String,
    #[zeroize(skip)]
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Check that every field is present. Runs before any token request.
    pub fn validate(&self) -> Result<(), AuthError> {
        let fields = [
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AuthError::MissingCredentials(name));
            }
        }
        Ok(())
    }
}

// Custom Debug implementation that redacts the secret
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_first_missing_field() {
        let creds = Credentials::new("tenant", "", "secret");
        match creds.validate() {
            Err(AuthError::MissingCredentials(field)) => assert_eq!(field, "client_id"),
            other => panic!("unexpected: {:?}", other),
        }

        let creds = Credentials::new("tenant", "client", "  ");
        assert!(matches!(
            creds.validate(),
            Err(AuthError::MissingCredentials("client_secret"))
        ));

        assert!(Credentials::new("t", "c", "s").validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("tenant", "client", "super-secret-value");
        let out = format!("{:?}", creds);
        assert!(out.contains("tenant"));
        assert!(!out.contains("super-secret-value"));
        assert!(out.contains("[REDACTED]"));
    }
}

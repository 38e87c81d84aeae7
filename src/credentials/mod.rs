//! Credential checks behind the auth handlers.
//!
//! Handlers only see the [`CredentialVerifier`] trait. The bundled
//! [`StaticCredentials`] compares against a single configured account and a
//! single bearer token; a password store or token signer plugs in here without
//! changing any handler.

use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

/// Capability for checking credentials and bearer tokens
pub trait CredentialVerifier: Send + Sync {
    /// Check an email/password pair
    fn verify(&self, email: &str, password: &str) -> bool;

    /// Check a bearer token (without the `Bearer ` prefix)
    fn verify_token(&self, token: &str) -> bool;

    /// Token handed to a client after a successful `verify`
    fn issue_token(&self, email: &str) -> String;
}

/// Verifier backed by the fixed account from [`AuthConfig`]
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    email: String,
    password: String,
    token: String,
}

impl StaticCredentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            token: token.into(),
        }
    }
}

impl From<&AuthConfig> for StaticCredentials {
    fn from(config: &AuthConfig) -> Self {
        Self::new(&config.admin_email, &config.admin_password, &config.token)
    }
}

/// Constant-time equality; lengths are compared first
fn secure_eq(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    expected.len() == provided.len() && expected.ct_eq(provided).into()
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, email: &str, password: &str) -> bool {
        // Evaluate both so timing doesn't reveal which field was wrong
        let email_ok = secure_eq(&self.email, email);
        let password_ok = secure_eq(&self.password, password);
        email_ok & password_ok
    }

    fn verify_token(&self, token: &str) -> bool {
        secure_eq(&self.token, token)
    }

    fn issue_token(&self, _email: &str) -> String {
        self.token.clone()
    }
}

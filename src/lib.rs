pub mod api;
pub mod config;
pub mod credentials;
pub mod models;

use config::Config;
use std::sync::Arc;

use crate::credentials::{CredentialVerifier, StaticCredentials};

/// Shared, read-only state handed to every handler
pub struct AppState {
    pub config: Config,
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Build state with the static verifier from `config.auth`
    pub fn new(config: Config) -> Self {
        let verifier = Arc::new(StaticCredentials::from(&config.auth));
        Self { config, verifier }
    }

    /// Swap in a different credential verifier
    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

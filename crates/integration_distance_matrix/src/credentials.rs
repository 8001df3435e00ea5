//! Credential suppliers
//!
//! A supplier adds the authentication parameters to an encoded query right
//! before dispatch. Failing to produce credentials is a configuration error
//! and stops the call before any network I/O.

use std::{env, sync::Arc};

#[cfg(test)]
use mockall::automock;
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::config::DistanceMatrixConfig;
use crate::error::DistanceMatrixError;
use crate::query::QueryParams;

/// Query parameter carrying the API key
pub const API_KEY_PARAM: &str = "key";

/// Supplies the credential parameters appended to every query
#[cfg_attr(test, automock)]
pub trait CredentialSupplier: Send + Sync {
    /// Add credential parameters to `params`
    ///
    /// # Errors
    ///
    /// Returns [`DistanceMatrixError::ConfigurationError`] if no usable
    /// credential is available.
    fn apply(&self, params: &mut QueryParams) -> Result<(), DistanceMatrixError>;
}

/// A fixed API key
#[derive(Clone)]
pub struct ApiKeyCredentials {
    key: SecretString,
}

impl ApiKeyCredentials {
    #[must_use]
    pub const fn new(key: SecretString) -> Self {
        Self { key }
    }
}

impl std::fmt::Debug for ApiKeyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCredentials")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl CredentialSupplier for ApiKeyCredentials {
    fn apply(&self, params: &mut QueryParams) -> Result<(), DistanceMatrixError> {
        let key = self.key.expose_secret().trim();
        if key.is_empty() {
            return Err(DistanceMatrixError::ConfigurationError(
                "API key must not be empty".to_string(),
            ));
        }
        params.insert(API_KEY_PARAM, key);
        Ok(())
    }
}

/// API key read from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvApiKeyCredentials {
    var: String,
}

impl EnvApiKeyCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSupplier for EnvApiKeyCredentials {
    fn apply(&self, params: &mut QueryParams) -> Result<(), DistanceMatrixError> {
        match env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => {
                params.insert(API_KEY_PARAM, value.trim());
                Ok(())
            },
            Ok(_) | Err(env::VarError::NotPresent) => {
                warn!(env_var = %self.var, "API key not found in environment");
                Err(DistanceMatrixError::ConfigurationError(format!(
                    "API key not set (env: {})",
                    self.var
                )))
            },
            Err(env::VarError::NotUnicode(_)) => Err(DistanceMatrixError::ConfigurationError(
                format!("API key contains invalid UTF-8: {}", self.var),
            )),
        }
    }
}

/// Build the supplier described by the configuration
///
/// An explicit `api_key` wins over the environment lookup.
#[must_use]
pub fn from_config(config: &DistanceMatrixConfig) -> Arc<dyn CredentialSupplier> {
    match &config.api_key {
        Some(key) => Arc::new(ApiKeyCredentials::new(key.clone())),
        None => Arc::new(EnvApiKeyCredentials::new(config.api_key_env.clone())),
    }
}

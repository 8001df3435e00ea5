//! Distance matrix client configuration

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the distance matrix client
#[derive(Clone, Serialize, Deserialize)]
pub struct DistanceMatrixConfig {
    /// Base URL of the service, without the resource path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Client-side request rate limit (0 disables rate limiting)
    #[serde(default)]
    pub requests_per_second: u32,

    /// API key (sensitive, never serialized); takes precedence over `api_key_env`
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl std::fmt::Debug for DistanceMatrixConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceMatrixConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("requests_per_second", &self.requests_per_second)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("api_key_env", &self.api_key_env)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("integration_distance_matrix/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_MAPS_API_KEY".to_string()
}

impl Default for DistanceMatrixConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            requests_per_second: 0,
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl DistanceMatrixConfig {
    /// Create a configuration suitable for testing against a local mock server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            api_key: Some(SecretString::from("AIzaNotReallyAnAPIKey".to_string())),
            ..Default::default()
        }
    }

    /// Check if client-side rate limiting is enabled
    #[must_use]
    pub const fn rate_limiting_enabled(&self) -> bool {
        self.requests_per_second > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        let url = Url::parse(&self.base_url).map_err(|e| format!("base_url is invalid: {e}"))?;
        if url.cannot_be_a_base() {
            return Err("base_url cannot be used as a base URL".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

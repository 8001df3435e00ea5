//! Distance matrix HTTP client
//!
//! Runs the full pipeline for one call: validation, query encoding,
//! credentials, rate limiting, dispatch and decoding. Cancellation is
//! checked before anything is sent and raced against every wait.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::DistanceMatrixConfig;
use crate::credentials::{self, CredentialSupplier};
use crate::decode::{check_dimensions, decode_response};
use crate::error::DistanceMatrixError;
use crate::query::{QueryParams, encode_request};
use crate::rate_limit::{RateLimiter, TokenBucketLimiter};
use crate::request::DistanceMatrixRequest;
use crate::response::DistanceMatrixResponse;
use crate::validation::validate_request;

/// Resource path of the distance matrix endpoint
pub const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";

/// Maximum number of body bytes kept in a transport error
const MAX_BODY_SNIPPET: usize = 512;

/// Trait for distance matrix clients
#[async_trait]
pub trait DistanceMatrixClient: Send + Sync {
    /// Execute one matrix query
    ///
    /// Validation errors are returned before any I/O. A cancelled token
    /// yields [`DistanceMatrixError::Cancelled`]; no partial result is ever
    /// returned.
    async fn execute(
        &self,
        cancel: &CancellationToken,
        request: &DistanceMatrixRequest,
    ) -> Result<DistanceMatrixResponse, DistanceMatrixError>;
}

/// Distance matrix client over HTTP
pub struct HttpDistanceMatrixClient {
    client: Client,
    endpoint: Url,
    credentials: Arc<dyn CredentialSupplier>,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
    timeout_secs: u64,
}

impl fmt::Debug for HttpDistanceMatrixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDistanceMatrixClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("rate_limited", &self.rate_limiter.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl HttpDistanceMatrixClient {
    /// Create a new distance matrix client
    ///
    /// Credentials come from the configuration (explicit key or environment
    /// variable); a token bucket limiter is installed when
    /// `requests_per_second` is non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &DistanceMatrixConfig) -> Result<Self, DistanceMatrixError> {
        config
            .validate()
            .map_err(DistanceMatrixError::ConfigurationError)?;

        let endpoint = Self::endpoint_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DistanceMatrixError::ConfigurationError(e.to_string()))?;

        let rate_limiter = config.rate_limiting_enabled().then(|| {
            Arc::new(TokenBucketLimiter::new(config.requests_per_second)) as Arc<dyn RateLimiter>
        });

        Ok(Self {
            client,
            endpoint,
            credentials: credentials::from_config(config),
            rate_limiter,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Replace the credential supplier
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSupplier>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Install a rate limiter, possibly shared with other clients
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    /// Full endpoint URL, without query
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Join the base URL and the resource path, keeping any base path prefix
    fn endpoint_url(base_url: &str) -> Result<Url, DistanceMatrixError> {
        let joined = format!("{}{DISTANCE_MATRIX_PATH}", base_url.trim_end_matches('/'));
        Url::parse(&joined).map_err(|e| {
            DistanceMatrixError::ConfigurationError(format!("invalid endpoint {joined}: {e}"))
        })
    }

    /// Perform the GET and return the body of a 2xx response
    async fn dispatch(&self, params: &QueryParams) -> Result<String, DistanceMatrixError> {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&params.encode()));

        let response = self.client.get(url).send().await.map_err(|e| {
            let body = if e.is_timeout() {
                format!("request timed out after {} seconds", self.timeout_secs)
            } else {
                e.to_string()
            };
            DistanceMatrixError::TransportError { status: None, body }
        })?;

        let status = response.status();

        if !status.is_success() {
            warn!(%status, "Distance matrix request failed");
            return Err(DistanceMatrixError::TransportError {
                status: Some(status.as_u16()),
                body: read_snippet(response, MAX_BODY_SNIPPET).await,
            });
        }

        response
            .text()
            .await
            .map_err(|e| DistanceMatrixError::TransportError {
                status: Some(status.as_u16()),
                body: e.to_string(),
            })
    }
}

#[async_trait]
impl DistanceMatrixClient for HttpDistanceMatrixClient {
    #[instrument(
        skip(self, cancel, request),
        fields(origins = request.origins.len(), destinations = request.destinations.len())
    )]
    async fn execute(
        &self,
        cancel: &CancellationToken,
        request: &DistanceMatrixRequest,
    ) -> Result<DistanceMatrixResponse, DistanceMatrixError> {
        validate_request(request)?;

        if cancel.is_cancelled() {
            debug!("Cancelled before dispatch");
            return Err(DistanceMatrixError::Cancelled);
        }

        let mut params = encode_request(request);
        debug!(query = %params.encode(), "Encoded distance matrix query");

        self.credentials.apply(&mut params)?;

        if let Some(rate_limiter) = &self.rate_limiter {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("Cancelled while waiting for rate limiter");
                    return Err(DistanceMatrixError::Cancelled);
                }
                () = rate_limiter.acquire() => {}
            }
        }

        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Cancelled while awaiting response");
                return Err(DistanceMatrixError::Cancelled);
            }
            result = self.dispatch(&params) => result?,
        };

        let response = decode_response(&body).inspect_err(|e| {
            if let DistanceMatrixError::ServiceError { status, .. } = e {
                warn!(%status, "Distance matrix service rejected request");
            }
        })?;

        check_dimensions(&response, request.origins.len(), request.destinations.len())?;

        Ok(response)
    }
}

/// Read at most `max` bytes of an error body
///
/// Stops pulling chunks once the limit is reached so a large error page is
/// never buffered in full. A body that fails mid-stream keeps what arrived.
async fn read_snippet(mut response: Response, max: usize) -> String {
    let mut buf = Vec::with_capacity(max);
    while buf.len() < max {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Failed to read error body");
                break;
            },
        }
    }
    buf.truncate(max);
    let text = String::from_utf8_lossy(&buf);
    snippet(&text, max).to_string()
}

/// Longest prefix of `body` no longer than `max` bytes, cut on a char boundary
fn snippet(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

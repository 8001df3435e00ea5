//! Distance Matrix API integration
//!
//! Typed client for the Google Maps Distance Matrix API
//! (<https://developers.google.com/maps/documentation/distance-matrix>).
//! Computes travel distance and duration for every origin × destination pair.
//!
//! # Architecture
//!
//! One call runs a fixed pipeline:
//!
//! 1. [`validate_request`] checks cross-field invariants (no I/O)
//! 2. [`encode_request`] builds a deterministic, key-sorted query
//! 3. a [`CredentialSupplier`] appends the API key
//! 4. an optional [`RateLimiter`] gates the call
//! 5. [`HttpDistanceMatrixClient`] performs one GET, racing it against a
//!    [`CancellationToken`](tokio_util::sync::CancellationToken)
//! 6. [`decode_response`] turns the body into a [`DistanceMatrixResponse`]
//!
//! A failed element (e.g. `NOT_FOUND` for one pair) is data on that
//! [`Element`], not an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_distance_matrix::{
//!     DistanceMatrixClient, DistanceMatrixConfig, DistanceMatrixRequest, HttpDistanceMatrixClient,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let client = HttpDistanceMatrixClient::new(&DistanceMatrixConfig::default())?;
//! let request = DistanceMatrixRequest::new(["Sydney", "Pyrmont"], ["Parramatta"]);
//!
//! let response = client.execute(&CancellationToken::new(), &request).await?;
//! for (origin, destination, element) in response.iter_pairs() {
//!     println!("{origin} -> {destination}: {:?}", element.duration);
//! }
//! ```

mod client;
mod config;
mod credentials;
mod decode;
mod error;
mod options;
mod query;
mod rate_limit;
mod request;
mod response;
mod validation;

pub use client::{DISTANCE_MATRIX_PATH, DistanceMatrixClient, HttpDistanceMatrixClient};
pub use config::DistanceMatrixConfig;
pub use credentials::{API_KEY_PARAM, ApiKeyCredentials, CredentialSupplier, EnvApiKeyCredentials};
pub use decode::{check_dimensions, decode_response};
pub use error::DistanceMatrixError;
pub use options::{
    Avoid, ElementStatus, TrafficModel, TransitMode, TransitRoutingPreference, TravelMode, Units,
    UnknownToken,
};
pub use query::{MULTI_VALUE_SEPARATOR, QueryParams, encode_request};
pub use rate_limit::{RateLimiter, TokenBucketLimiter};
pub use request::{DEPARTURE_NOW, DistanceMatrixRequest};
pub use response::{Distance, DistanceMatrixResponse, Element, Fare, Row};
pub use validation::validate_request;

//! Query string encoding
//!
//! Parameters are kept sorted by key so the encoded query is byte-identical
//! for identical requests, credentials included.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::request::DistanceMatrixRequest;

/// Separator for multi-value parameters
pub const MULTI_VALUE_SEPARATOR: &str = "|";

/// Ordered set of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<&'static str, String>,
}

impl QueryParams {
    /// Create an empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value for the key
    pub fn insert(&mut self, key: &'static str, value: impl Into<String>) {
        self.params.insert(key, value.into());
    }

    /// Set a parameter only when a value is present
    fn insert_opt<T: ToString>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key, value.to_string());
        }
    }

    /// Set a `|`-joined parameter unconditionally
    fn insert_required<I>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.insert(key, join(values));
    }

    /// Set a `|`-joined parameter, skipping empty lists
    fn insert_joined<I>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let joined = join(values);
        if !joined.is_empty() {
            self.insert(key, joined);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over `(key, value)` pairs in encoding order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Render as a percent-encoded `key=value&...` string
    #[must_use]
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Map a request onto the service's query parameters
///
/// The request is expected to have passed validation; no cross-field checks
/// are repeated here. The API key is not part of the result.
#[must_use]
pub fn encode_request(request: &DistanceMatrixRequest) -> QueryParams {
    let mut params = QueryParams::new();

    params.insert_required("origins", &request.origins);
    params.insert_required("destinations", &request.destinations);
    params.insert_opt("mode", request.mode);
    params.insert_opt("language", non_empty(request.language.as_deref()));
    params.insert_opt("region", non_empty(request.region.as_deref()));
    params.insert_opt("avoid", request.avoid);
    params.insert_opt("units", request.units);
    params.insert_opt("departure_time", non_empty(request.departure_time.as_deref()));
    params.insert_opt("arrival_time", non_empty(request.arrival_time.as_deref()));
    params.insert_joined(
        "transit_mode",
        request.transit_mode.iter().map(|m| m.as_str()),
    );
    params.insert_opt(
        "transit_routing_preference",
        request.transit_routing_preference,
    );
    params.insert_opt("traffic_model", request.traffic_model);

    params
}

fn join<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(MULTI_VALUE_SEPARATOR)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

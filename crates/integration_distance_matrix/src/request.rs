//! Distance matrix request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::options::{Avoid, TrafficModel, TransitMode, TransitRoutingPreference, TravelMode, Units};

/// Literal departure time token meaning "leave right away"
pub const DEPARTURE_NOW: &str = "now";

/// A single matrix query: every origin against every destination
///
/// Origins and destinations are free-form location strings (addresses,
/// place names or `lat,lng` pairs). Optional modifiers left as `None` are
/// not sent to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceMatrixRequest {
    /// Starting points, one row per origin in the response
    pub origins: Vec<String>,
    /// End points, one element per destination in each row
    pub destinations: Vec<String>,
    /// Travel mode; the service assumes driving when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TravelMode>,
    /// Language of the returned address labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Region bias as a ccTLD code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid: Option<Avoid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    /// Unix timestamp in seconds, or `"now"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    /// Unix timestamp in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    /// Preferred transit vehicles (transit mode only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transit_mode: Vec<TransitMode>,
    /// Transit route bias (transit mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_routing_preference: Option<TransitRoutingPreference>,
    /// Traffic assumption (driving only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_model: Option<TrafficModel>,
}

impl DistanceMatrixRequest {
    /// Create a request for the given origins and destinations
    pub fn new<O, D>(origins: O, destinations: D) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
            destinations: destinations.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Mode the service will actually use
    #[must_use]
    pub fn effective_mode(&self) -> TravelMode {
        self.mode.unwrap_or_default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_avoid(mut self, avoid: Avoid) -> Self {
        self.avoid = Some(avoid);
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    /// Set the departure time token (`"now"` or unix seconds)
    #[must_use]
    pub fn with_departure_time(mut self, token: impl Into<String>) -> Self {
        self.departure_time = Some(token.into());
        self
    }

    /// Set the departure time from a timestamp
    #[must_use]
    pub fn departure_at(self, at: DateTime<Utc>) -> Self {
        self.with_departure_time(at.timestamp().to_string())
    }

    /// Set the arrival time token (unix seconds)
    #[must_use]
    pub fn with_arrival_time(mut self, token: impl Into<String>) -> Self {
        self.arrival_time = Some(token.into());
        self
    }

    /// Set the arrival time from a timestamp
    #[must_use]
    pub fn arrival_at(self, at: DateTime<Utc>) -> Self {
        self.with_arrival_time(at.timestamp().to_string())
    }

    /// Add a preferred transit vehicle, keeping insertion order and skipping duplicates
    #[must_use]
    pub fn with_transit_mode(mut self, transit_mode: TransitMode) -> Self {
        if !self.transit_mode.contains(&transit_mode) {
            self.transit_mode.push(transit_mode);
        }
        self
    }

    #[must_use]
    pub fn with_transit_routing_preference(mut self, preference: TransitRoutingPreference) -> Self {
        self.transit_routing_preference = Some(preference);
        self
    }

    #[must_use]
    pub fn with_traffic_model(mut self, model: TrafficModel) -> Self {
        self.traffic_model = Some(model);
        self
    }
}

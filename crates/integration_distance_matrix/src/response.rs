//! Distance matrix response model

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::options::ElementStatus;

/// Travel distance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distance {
    /// Label in the requested unit system, e.g. `"23.8 km"`
    pub human_readable: String,
    /// Exact length in meters
    pub meters: u64,
}

/// Fare for a transit element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    /// ISO 4217 currency code
    pub currency: String,
    /// Amount in `currency`
    pub value: f64,
    /// Formatted amount, e.g. `"$6.00"`
    pub text: String,
}

/// Result for one origin/destination pair
///
/// `duration` and `distance` are present exactly when `status` is
/// [`ElementStatus::Ok`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub status: ElementStatus,
    #[serde(with = "opt_seconds", default)]
    pub duration: Option<Duration>,
    pub distance: Option<Distance>,
    /// Duration with current traffic, driving requests with a departure time only
    #[serde(with = "opt_seconds", default)]
    pub duration_in_traffic: Option<Duration>,
    /// Transit fare, when the service knows it
    pub fare: Option<Fare>,
}

impl Element {
    /// An element for which the service did not compute a route
    #[must_use]
    pub const fn failed(status: ElementStatus) -> Self {
        Self {
            status,
            duration: None,
            distance: None,
            duration_in_traffic: None,
            fare: None,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ElementStatus::Ok
    }
}

/// Durations as whole seconds, the same unit the service sends
mod opt_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

/// Elements for one origin, in destination order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub elements: Vec<Element>,
}

/// Decoded result of a matrix query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Resolved origin addresses, in request order
    pub origin_addresses: Vec<String>,
    /// Resolved destination addresses, in request order
    pub destination_addresses: Vec<String>,
    /// One row per origin
    pub rows: Vec<Row>,
}

impl DistanceMatrixResponse {
    /// Element for the given origin and destination indices
    #[must_use]
    pub fn element(&self, origin: usize, destination: usize) -> Option<&Element> {
        self.rows.get(origin)?.elements.get(destination)
    }

    /// Iterate over `(origin index, destination index, element)`
    pub fn iter_pairs(&self) -> impl Iterator<Item = (usize, usize, &Element)> {
        self.rows.iter().enumerate().flat_map(|(origin, row)| {
            row.elements
                .iter()
                .enumerate()
                .map(move |(destination, element)| (origin, destination, element))
        })
    }

    /// Number of elements that failed individually
    #[must_use]
    pub fn failed_elements(&self) -> usize {
        self.iter_pairs().filter(|(_, _, e)| !e.is_ok()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_element(seconds: u64, meters: u64) -> Element {
        Element {
            status: ElementStatus::Ok,
            duration: Some(Duration::from_secs(seconds)),
            distance: Some(Distance {
                human_readable: format!("{meters} m"),
                meters,
            }),
            duration_in_traffic: None,
            fare: None,
        }
    }

    fn sample() -> DistanceMatrixResponse {
        DistanceMatrixResponse {
            origin_addresses: vec!["A".to_string(), "B".to_string()],
            destination_addresses: vec!["X".to_string(), "Y".to_string()],
            rows: vec![
                Row {
                    elements: vec![ok_element(60, 1000), Element::failed(ElementStatus::NotFound)],
                },
                Row {
                    elements: vec![ok_element(120, 2000), ok_element(180, 3000)],
                },
            ],
        }
    }

    #[test]
    fn test_element_lookup() {
        let response = sample();
        assert_eq!(
            response.element(1, 1).and_then(|e| e.distance.as_ref()).map(|d| d.meters),
            Some(3000)
        );
        assert_eq!(response.element(0, 1).map(|e| e.status), Some(ElementStatus::NotFound));
        assert!(response.element(2, 0).is_none());
        assert!(response.element(0, 2).is_none());
    }

    #[test]
    fn test_iter_pairs_in_row_major_order() {
        let response = sample();
        let indices: Vec<(usize, usize)> = response.iter_pairs().map(|(o, d, _)| (o, d)).collect();
        assert_eq!(indices, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(response.failed_elements(), 1);
    }

    #[test]
    fn test_durations_serialize_as_seconds() {
        let json = serde_json::to_value(ok_element(2215, 23846)).unwrap();
        assert_eq!(json["duration"], 2215);
        assert!(json["duration_in_traffic"].is_null());

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back.duration, Some(Duration::from_secs(2215)));
    }

    #[test]
    fn test_failed_element_has_no_measurements() {
        let element = Element::failed(ElementStatus::ZeroResults);
        assert!(!element.is_ok());
        assert!(element.duration.is_none());
        assert!(element.distance.is_none());
    }
}

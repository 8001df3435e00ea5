//! Response decoding
//!
//! Turns the raw JSON body into a [`DistanceMatrixResponse`]. A non-OK
//! top-level status fails the whole call; a non-OK element status is kept as
//! data on that element.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::DistanceMatrixError;
use crate::options::ElementStatus;
use crate::response::{DistanceMatrixResponse, Distance, Element, Fare, Row};

const STATUS_OK: &str = "OK";

/// Decode a response body
///
/// # Errors
///
/// Returns [`DistanceMatrixError::ServiceError`] for a non-OK top-level
/// status and [`DistanceMatrixError::DecodeError`] for malformed bodies.
pub fn decode_response(body: &str) -> Result<DistanceMatrixResponse, DistanceMatrixError> {
    let envelope: RawEnvelope = serde_json::from_str(body).map_err(decode_error)?;

    if envelope.status != STATUS_OK {
        return Err(DistanceMatrixError::ServiceError {
            status: envelope.status,
            message: envelope.error_message,
        });
    }

    let raw: RawResponse = serde_json::from_str(body).map_err(decode_error)?;

    let rows = raw
        .rows
        .into_iter()
        .enumerate()
        .map(|(origin, row)| convert_row(origin, row))
        .collect::<Result<Vec<_>, _>>()?;

    let response = DistanceMatrixResponse {
        origin_addresses: raw.origin_addresses,
        destination_addresses: raw.destination_addresses,
        rows,
    };

    debug!(
        rows = response.rows.len(),
        failed_elements = response.failed_elements(),
        "Decoded distance matrix"
    );

    Ok(response)
}

/// Check that the response has one row per origin and one element per destination
///
/// # Errors
///
/// Returns [`DistanceMatrixError::DecodeError`] describing the first mismatch.
pub fn check_dimensions(
    response: &DistanceMatrixResponse,
    origins: usize,
    destinations: usize,
) -> Result<(), DistanceMatrixError> {
    if response.rows.len() != origins {
        return Err(DistanceMatrixError::DecodeError(format!(
            "expected {origins} rows, got {}",
            response.rows.len()
        )));
    }

    for (index, row) in response.rows.iter().enumerate() {
        if row.elements.len() != destinations {
            return Err(DistanceMatrixError::DecodeError(format!(
                "row {index}: expected {destinations} elements, got {}",
                row.elements.len()
            )));
        }
    }

    Ok(())
}

fn decode_error(e: serde_json::Error) -> DistanceMatrixError {
    DistanceMatrixError::DecodeError(e.to_string())
}

fn convert_row(origin: usize, raw: RawRow) -> Result<Row, DistanceMatrixError> {
    let elements = raw
        .elements
        .into_iter()
        .enumerate()
        .map(|(destination, element)| convert_element(origin, destination, element))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Row { elements })
}

fn convert_element(
    origin: usize,
    destination: usize,
    raw: RawElement,
) -> Result<Element, DistanceMatrixError> {
    if raw.status != ElementStatus::Ok {
        return Ok(Element::failed(raw.status));
    }

    let missing = |field: &str| {
        DistanceMatrixError::DecodeError(format!(
            "element ({origin}, {destination}) has status OK but no {field}"
        ))
    };

    let distance = raw.distance.ok_or_else(|| missing("distance"))?;
    let duration = raw.duration.ok_or_else(|| missing("duration"))?;

    Ok(Element {
        status: raw.status,
        duration: Some(Duration::from_secs(duration.value)),
        distance: Some(Distance {
            human_readable: distance.text,
            meters: distance.value,
        }),
        duration_in_traffic: raw
            .duration_in_traffic
            .map(|d| Duration::from_secs(d.value)),
        fare: raw.fare.map(|f| Fare {
            currency: f.currency,
            value: f.value,
            text: f.text,
        }),
    })
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    origin_addresses: Vec<String>,
    #[serde(default)]
    destination_addresses: Vec<String>,
    #[serde(default)]
    rows: Vec<RawRow>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    status: ElementStatus,
    distance: Option<RawDistance>,
    duration: Option<RawDuration>,
    duration_in_traffic: Option<RawDuration>,
    fare: Option<RawFare>,
}

#[derive(Debug, Deserialize)]
struct RawDistance {
    text: String,
    value: u64,
}

/// Durations are whole seconds on the wire
#[derive(Debug, Deserialize)]
struct RawDuration {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct RawFare {
    currency: String,
    value: f64,
    text: String,
}

//! Request validation
//!
//! Cross-field checks that run before any network I/O. Checks are applied
//! in a fixed order and the first failure is returned.

use crate::error::DistanceMatrixError;
use crate::options::TravelMode;
use crate::request::DistanceMatrixRequest;

/// Validate a request
///
/// # Errors
///
/// Returns the first violated invariant as a validation error.
pub fn validate_request(request: &DistanceMatrixRequest) -> Result<(), DistanceMatrixError> {
    if !has_location(&request.origins) {
        return Err(DistanceMatrixError::MissingOrigins);
    }

    if !has_location(&request.destinations) {
        return Err(DistanceMatrixError::MissingDestinations);
    }

    if request.departure_time.is_some() && request.arrival_time.is_some() {
        return Err(DistanceMatrixError::ConflictingTimeParameters);
    }

    let mode = request.effective_mode();

    if !request.transit_mode.is_empty() && mode != TravelMode::Transit {
        return Err(DistanceMatrixError::InvalidModifierForMode {
            modifier: "transit_mode",
            mode,
        });
    }

    if request.transit_routing_preference.is_some() && mode != TravelMode::Transit {
        return Err(DistanceMatrixError::InvalidModifierForMode {
            modifier: "transit_routing_preference",
            mode,
        });
    }

    if request.traffic_model.is_some() && mode != TravelMode::Driving {
        return Err(DistanceMatrixError::InvalidModifierForMode {
            modifier: "traffic_model",
            mode,
        });
    }

    Ok(())
}

/// At least one entry names a place; blank strings do not count
fn has_location(locations: &[String]) -> bool {
    locations.iter().any(|l| !l.trim().is_empty())
}

//! Plain-text rendering of matrix results

use std::{fmt::Write, time::Duration};

use integration_distance_matrix::{DistanceMatrixRequest, DistanceMatrixResponse};

fn label(resolved: &[String], input: &[String], index: usize) -> String {
    resolved
        .get(index)
        .filter(|s| !s.is_empty())
        .or_else(|| input.get(index))
        .cloned()
        .unwrap_or_default()
}

/// Format a duration as `1h 5m`, `37m` or `45s`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// One line per origin/destination pair
///
/// Labels prefer the service's resolved addresses and fall back to the
/// request's input when the service returned an empty label.
pub fn render_table(request: &DistanceMatrixRequest, response: &DistanceMatrixResponse) -> String {
    let mut out = String::new();
    for (origin, destination, element) in response.iter_pairs() {
        let from = label(&response.origin_addresses, &request.origins, origin);
        let to = label(&response.destination_addresses, &request.destinations, destination);

        let result = match (&element.distance, element.duration) {
            (Some(distance), Some(duration)) if element.is_ok() => {
                let mut line = format!("{}, {}", distance.human_readable, format_duration(duration));
                if let Some(traffic) = element.duration_in_traffic {
                    let _ = write!(line, " ({} in traffic)", format_duration(traffic));
                }
                if let Some(fare) = &element.fare {
                    let _ = write!(line, ", fare {}", fare.text);
                }
                line
            },
            _ => element.status.to_string(),
        };

        let _ = writeln!(out, "{from} → {to}: {result}");
    }
    out
}

//! Enumerated request and response options
//!
//! Every option has a fixed wire token. The mapping is total in both
//! directions: [`as_str`](TravelMode::as_str) renders the token sent to the
//! service and [`FromStr`] accepts exactly the same set of tokens.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string did not match any token of the named option set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {option} token: {token:?}")]
pub struct UnknownToken {
    /// Name of the option set that was being parsed
    pub option: &'static str,
    /// The rejected input
    pub token: String,
}

/// Declares a closed option enum together with its wire-token mapping.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal, $rename:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = $rename)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every value of this option, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire token for this value
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok(Self::$variant),)+
                    other => Err(UnknownToken {
                        option: $label,
                        token: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Means of transport used to compute distances and durations
    #[derive(Default)]
    TravelMode, "travel mode", "snake_case" {
        /// Road network (the service default)
        #[default]
        Driving => "driving",
        /// Pedestrian paths and sidewalks
        Walking => "walking",
        /// Bicycle paths and preferred streets
        Bicycling => "bicycling",
        /// Public transit routes
        Transit => "transit",
    }
}

wire_enum! {
    /// Route feature to avoid
    Avoid, "avoidance feature", "snake_case" {
        Tolls => "tolls",
        Highways => "highways",
        Ferries => "ferries",
        Indoor => "indoor",
    }
}

wire_enum! {
    /// Unit system for the human-readable distance labels
    Units, "unit system", "snake_case" {
        Metric => "metric",
        Imperial => "imperial",
    }
}

wire_enum! {
    /// Preferred public transit vehicle type
    TransitMode, "transit mode", "snake_case" {
        Bus => "bus",
        Subway => "subway",
        Train => "train",
        Tram => "tram",
        /// Train, tram, light rail and subway
        Rail => "rail",
    }
}

wire_enum! {
    /// Bias for transit route selection
    TransitRoutingPreference, "transit routing preference", "snake_case" {
        LessWalking => "less_walking",
        FewerTransfers => "fewer_transfers",
    }
}

wire_enum! {
    /// Assumption used when computing time in traffic
    TrafficModel, "traffic model", "snake_case" {
        BestGuess => "best_guess",
        Pessimistic => "pessimistic",
        Optimistic => "optimistic",
    }
}

wire_enum! {
    /// Status of a single origin/destination element
    ElementStatus, "element status", "SCREAMING_SNAKE_CASE" {
        /// A route was found; distance and duration are present
        Ok => "OK",
        /// The origin or destination could not be geocoded
        NotFound => "NOT_FOUND",
        /// No route exists between the pair
        ZeroResults => "ZERO_RESULTS",
        /// The route is too long to be processed
        MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
    }
}

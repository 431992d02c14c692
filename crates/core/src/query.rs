//! Search query parameters.

use serde::{Deserialize, Serialize};

/// Minimum origin-name length accepted for distance filtering.
const MIN_ORIGIN_NAME_LEN: usize = 2;

/// Reference to the commute origin place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginRef {
    /// An opaque place key, resolved earlier via a suggestion pick.
    Key(String),
    /// A free-typed place name with an optional region code to disambiguate.
    Name {
        /// Place name as typed.
        name: String,
        /// Region code (`kraj`) of the place, when known.
        region: Option<String>,
    },
}

impl OriginRef {
    /// Whether the reference carries enough signal to geocode at all.
    pub fn is_usable(&self) -> bool {
        match self {
            OriginRef::Key(key) => !key.trim().is_empty(),
            OriginRef::Name { name, .. } => {
                name.trim().chars().count() >= MIN_ORIGIN_NAME_LEN
            }
        }
    }
}

/// The full filter parameter set for one search run.
///
/// Every field is optional; the default query matches everything. A non-zero
/// [`max_distance_km`](Self::max_distance_km) requires a usable
/// [`origin`](Self::origin), otherwise the run is rejected before filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query; all tokens must match.
    #[serde(default)]
    pub text: String,
    /// Category tag driving role recommendations (not a filter).
    #[serde(default)]
    pub category: Option<String>,
    /// Focus id whose keyword set filters offers.
    #[serde(default)]
    pub focus: Option<String>,
    /// Region code equality filter (`kraj`).
    #[serde(default)]
    pub region: Option<String>,
    /// Commute origin place.
    #[serde(default)]
    pub origin: Option<OriginRef>,
    /// Minimum acceptable monthly-equivalent wage.
    #[serde(default)]
    pub wage_floor: Option<f64>,
    /// Maximum commute distance in km; `Some(>0)` activates the filter.
    #[serde(default)]
    pub max_distance_km: Option<f64>,
}

impl SearchQuery {
    /// Whether this query asks for distance filtering.
    pub fn wants_distance_filter(&self) -> bool {
        self.max_distance_km.is_some_and(|km| km > 0.0)
    }

    /// Whether the origin is present and usable for geocoding.
    pub fn has_usable_origin(&self) -> bool {
        self.origin.as_ref().is_some_and(OriginRef::is_usable)
    }
}

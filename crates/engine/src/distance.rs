//! Per-run distance memoization.

use pracehub_core::Offer;
use pracehub_geo::{haversine_km, Coordinate, GeoIndexService};
use pracehub_text::normalize;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoizes offer → origin distances for the duration of one search run.
///
/// Offers sharing a municipality+region resolve coordinates once; negative
/// lookups are cached too, so an ungeocodable place costs a single index
/// probe per run. A fresh cache per run avoids cross-run staleness.
pub struct DistanceCache {
    service: Arc<GeoIndexService>,
    coords: HashMap<String, Option<Coordinate>>,
}

impl DistanceCache {
    /// Create an empty cache over the shared geo index service.
    pub fn new(service: Arc<GeoIndexService>) -> Self {
        Self { service, coords: HashMap::new() }
    }

    /// Distance in km from the offer's municipality to the origin.
    ///
    /// `None` when the offer has no municipality or it cannot be geocoded.
    pub async fn distance_km(&mut self, offer: &Offer, origin: &Coordinate) -> Option<f64> {
        let municipality = offer.municipality.trim();
        if municipality.is_empty() {
            return None;
        }
        let region = offer.region_code.trim();
        let key = format!("{}|{}", normalize(municipality), region);

        if let Some(cached) = self.coords.get(&key) {
            return cached.map(|coord| haversine_km(origin, &coord));
        }

        let resolved = self.service.lookup_by_name(municipality, Some(region)).await;
        self.coords.insert(key, resolved);
        resolved.map(|coord| haversine_km(origin, &coord))
    }

    /// Number of memoized place keys (including negative entries).
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

//! Municipality centroid index.
//!
//! The index is produced by an offline build from the state geodata dump and
//! keyed three ways: by an opaque place key, by normalized place name, and by
//! normalized name + region code. Same-named places occur in several
//! regions; candidates are disambiguated by proximity to a fixed bias point
//! in the primary service area.

use crate::{haversine_km, Coordinate};
use pracehub_text::normalize;
use serde::Deserialize;
use std::collections::HashMap;

/// Reference coordinate of the primary service area (Bor u Tachova).
///
/// When a place name resolves to several municipalities, the one closest to
/// this point wins.
pub const BIAS_POINT: Coordinate = Coordinate::new(49.7129, 12.7756);

/// One `byKey` entry of the centroid index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceRecord {
    /// Place name (`n`).
    #[serde(rename = "n", default)]
    pub name: String,
    /// Region code (`k`).
    #[serde(rename = "k", default)]
    pub region_code: String,
    /// District name (`on`).
    #[serde(rename = "on", default)]
    pub district_name: String,
    /// Unit type tag (`t`): `obec` for full municipalities, smaller
    /// administrative units otherwise (e.g. `zsj`).
    #[serde(rename = "t", default)]
    pub kind: String,
    /// Owning municipality for settlement parts (`p`).
    #[serde(rename = "p", default)]
    pub parent: String,
    /// Centroid latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Centroid longitude.
    #[serde(default)]
    pub lon: Option<f64>,
}

impl PlaceRecord {
    /// Centroid coordinate, if the record is geocoded with finite values.
    pub fn coordinate(&self) -> Option<Coordinate> {
        coordinate_of(self.lat, self.lon)
    }
}

/// A candidate coordinate under a name or name+region key.
#[derive(Debug, Clone, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl Candidate {
    fn coordinate(&self) -> Option<Coordinate> {
        coordinate_of(self.lat, self.lon)
    }
}

fn coordinate_of(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinate> {
    match (lat, lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
            Some(Coordinate::new(lat, lon))
        }
        _ => None,
    }
}

/// Name+region values arrive as a list or, in older builds, a bare object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Candidate>),
    One(Candidate),
}

impl OneOrMany {
    fn as_slice(&self) -> &[Candidate] {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(c) => std::slice::from_ref(c),
        }
    }
}

/// Raw wire shape of the centroid index file.
#[derive(Debug, Default, Deserialize)]
pub struct CentroidIndex {
    /// Opaque place key → full place record.
    #[serde(rename = "byKey", default)]
    pub by_key: HashMap<String, PlaceRecord>,
    #[serde(rename = "byName", default)]
    by_name: HashMap<String, Vec<Candidate>>,
    #[serde(rename = "byNameKraj", default)]
    by_name_region: HashMap<String, OneOrMany>,
    /// Provenance blob carried through from the build, if any.
    #[serde(default)]
    pub source: Option<serde_json::Value>,
}

/// Lookup view over a loaded centroid index.
#[derive(Debug, Default)]
pub struct GeoIndex {
    data: CentroidIndex,
}

impl GeoIndex {
    /// Parse an index from its raw JSON value.
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        Ok(Self { data: serde_json::from_value(value)? })
    }

    /// Wrap an already-deserialized index.
    pub fn from_index(data: CentroidIndex) -> Self {
        Self { data }
    }

    /// Iterate all keyed place records.
    pub fn places(&self) -> impl Iterator<Item = (&str, &PlaceRecord)> {
        self.data.by_key.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keyed place records.
    pub fn len(&self) -> usize {
        self.data.by_key.len()
    }

    /// Whether the index holds no keyed records.
    pub fn is_empty(&self) -> bool {
        self.data.by_key.is_empty()
    }

    /// Resolve a place by its opaque key.
    pub fn lookup_by_key(&self, key: &str) -> Option<Coordinate> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.data.by_key.get(key)?.coordinate()
    }

    /// Resolve a place by name, optionally scoped to a region.
    ///
    /// Name+region candidates are preferred; when the composite has no
    /// usable candidate the name-only set is consulted. Multiple candidates
    /// are disambiguated by proximity to [`BIAS_POINT`].
    pub fn lookup_by_name(&self, name: &str, region: Option<&str>) -> Option<Coordinate> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }

        let region = region.map(str::trim).filter(|r| !r.is_empty());
        if let Some(rc) = region {
            let composite = format!("{key}|{rc}");
            if let Some(candidates) = self.data.by_name_region.get(&composite) {
                if let Some(best) = pick_closest(candidates.as_slice(), &BIAS_POINT) {
                    return Some(best);
                }
            }
        }

        self.data
            .by_name
            .get(&key)
            .and_then(|candidates| pick_closest(candidates, &BIAS_POINT))
    }
}

/// Candidate with the minimum great-circle distance to the bias point.
fn pick_closest(candidates: &[Candidate], bias: &Coordinate) -> Option<Coordinate> {
    let mut best: Option<(f64, Coordinate)> = None;
    for candidate in candidates {
        let Some(coord) = candidate.coordinate() else {
            continue;
        };
        let score = haversine_km(bias, &coord);
        if best.as_ref().is_none_or(|(b, _)| score < *b) {
            best = Some((score, coord));
        }
    }
    best.map(|(_, coord)| coord)
}

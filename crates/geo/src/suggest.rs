//! Ranking for place autocomplete suggestions.
//!
//! The suggestion list is a flattened, offline-built view of the centroid
//! index. Ranking favors matches in the place name over the district and
//! region, full municipalities over settlement parts, and exact names over
//! prefix hits.

use crate::index::PlaceRecord;
use pracehub_text::{normalize, token_in_text, tokenize, whole_word_in_text};
use serde::{Deserialize, Serialize};

/// Unit type tag of full municipalities.
const KIND_MUNICIPALITY: &str = "obec";
/// Unit type tag of basic settlement units, ranked below everything else.
const KIND_SETTLEMENT_UNIT: &str = "zsj";

/// One entry of the flattened suggestion list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    /// Opaque place key into the centroid index.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Normalized name, precomputed by the offline build.
    #[serde(rename = "nameKey", default)]
    pub name_key: String,
    /// Region code.
    #[serde(rename = "kraj", default)]
    pub region_code: String,
    /// District name.
    #[serde(rename = "okresName", default)]
    pub district_name: String,
    /// Unit type tag (`obec`, `zsj`, …).
    #[serde(rename = "t", default)]
    pub kind: String,
    /// Owning municipality for settlement parts.
    #[serde(rename = "parent", default)]
    pub parent: String,
}

impl PlaceSuggestion {
    /// Build a suggestion from a keyed centroid record.
    ///
    /// Returns `None` for records without a name, which carry no signal for
    /// autocomplete.
    pub fn from_place(key: &str, place: &PlaceRecord) -> Option<Self> {
        let name = place.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            name: name.to_string(),
            name_key: normalize(name),
            region_code: place.region_code.trim().to_string(),
            district_name: place.district_name.trim().to_string(),
            kind: place.kind.trim().to_string(),
            parent: place.parent.trim().to_string(),
        })
    }
}

/// Rank suggestions against a typed query.
///
/// All query tokens must match the combined name + district + region
/// haystack. The returned references are ordered best-first; the caller
/// decides how many to display. For a single-token query with exact-name
/// hits, only those hits are returned (typing "bor" should offer the towns
/// named Bor, not every Borovany).
pub fn rank_suggestions<'a, F>(
    items: &'a [PlaceSuggestion],
    query: &str,
    region_label: F,
) -> Vec<&'a PlaceSuggestion>
where
    F: Fn(&str) -> String,
{
    let q = normalize(query);
    let tokens: Vec<&str> = tokenize(&q).collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    let exact_key = if tokens.len() == 1 { Some(tokens[0]) } else { None };
    let phrase = tokens.join(" ");

    struct Scored<'a> {
        item: &'a PlaceSuggestion,
        score: i32,
        name_key: String,
    }

    let mut scored: Vec<Scored<'a>> = Vec::new();
    for item in items {
        let hay_name = normalize(&item.name);
        let hay_district = normalize(&item.district_name);
        let hay_region = normalize(&region_label(&item.region_code));
        let hay_all = format!("{hay_name} {hay_district} {hay_region}");

        if !tokens.iter().all(|t| token_in_text(&hay_all, t)) {
            continue;
        }

        let mut score = 0i32;
        for t in &tokens {
            if whole_word_in_text(&hay_name, t) {
                score += 6;
            } else if token_in_text(&hay_name, t) {
                score += 4;
            } else if whole_word_in_text(&hay_district, t) {
                score += 3;
            } else if token_in_text(&hay_district, t) {
                score += 2;
            } else if token_in_text(&hay_region, t) {
                score += 1;
            }
        }

        if exact_key == Some(hay_name.as_str()) {
            score += 20;
        }
        if item.kind == KIND_MUNICIPALITY {
            score += 2;
        }
        if item.kind == KIND_SETTLEMENT_UNIT {
            score -= 1;
        }
        if tokens.len() >= 2 && hay_name.contains(&phrase) {
            score += 2;
        }

        scored.push(Scored { item, score, name_key: hay_name });
    }

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.item.name.chars().count().cmp(&b.item.name.chars().count()))
            .then_with(|| a.name_key.cmp(&b.name_key))
            .then_with(|| a.item.name.cmp(&b.item.name))
    });

    if let Some(exact) = exact_key {
        let has_exact = scored.iter().any(|s| s.name_key == exact);
        if has_exact {
            return scored
                .into_iter()
                .filter(|s| s.name_key == exact)
                .map(|s| s.item)
                .collect();
        }
    }

    scored.into_iter().map(|s| s.item).collect()
}

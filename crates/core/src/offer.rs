//! The job-offer record.

use crate::wage;
use serde::{Deserialize, Deserializer, Serialize};

/// Portal detail-page prefix for offers that carry only an id.
const PORTAL_DETAIL_PREFIX: &str =
    "https://www.uradprace.cz/volna-mista-v-cr#/volna-mista-detail/";

/// A single job offer as delivered by a per-category data shard.
///
/// Field names on the wire are Czech (`profese`, `mzda_od`, …); missing
/// fields deserialize to their defaults. Offers are read-only inputs: the
/// engine never mutates them, and derived data (normalized text, distance)
/// lives outside this struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Profession title (`profese`).
    #[serde(rename = "profese", default)]
    pub title: String,
    /// Employer name (`zamestnavatel`).
    #[serde(rename = "zamestnavatel", default)]
    pub employer: String,
    /// Municipality of the workplace (`obec`).
    #[serde(rename = "obec", default)]
    pub municipality: String,
    /// District (`okres`).
    #[serde(rename = "okres", default)]
    pub district: String,
    /// Region code, NUTS-3 (`kraj`, e.g. `CZ032`).
    #[serde(rename = "kraj", default)]
    pub region_code: String,
    /// Region display name (`kraj_nazev`).
    #[serde(rename = "kraj_nazev", default)]
    pub region_name: String,
    /// Free-form locality string (`lokalita`).
    #[serde(rename = "lokalita", default)]
    pub locality: String,
    /// Lower wage bound (`mzda_od`), monthly Kč or Kč/h.
    #[serde(rename = "mzda_od", default)]
    pub wage_from: Option<f64>,
    /// Upper wage bound (`mzda_do`), monthly Kč or Kč/h.
    #[serde(rename = "mzda_do", default)]
    pub wage_to: Option<f64>,
    /// CZ-ISCO occupation classification (`cz_isco`).
    #[serde(rename = "cz_isco", default)]
    pub isco: String,
    /// Insertion date (`datum`), ISO-8601 `YYYY-MM-DD`.
    #[serde(rename = "datum", default)]
    pub inserted_at: String,
    /// Upstream portal id (`portal_id`), number or string on the wire.
    #[serde(rename = "portal_id", default, deserialize_with = "string_or_number")]
    pub portal_id: Option<String>,
    /// Source record id (`offer_id`).
    #[serde(rename = "offer_id", default)]
    pub offer_id: String,
    /// Reference number (`referencni_cislo`).
    #[serde(rename = "referencni_cislo", default)]
    pub reference_no: String,
    /// Direct detail URL from the data (`url_adresa`).
    #[serde(rename = "url_adresa", default)]
    pub url: String,
    /// Benefit lines (`vyhody`).
    #[serde(rename = "vyhody", default)]
    pub benefits: Vec<String>,
    /// Free-text description (`info`).
    #[serde(rename = "info", default)]
    pub info: String,
}

impl Offer {
    /// Whether either wage bound looks like an hourly rate.
    pub fn wage_is_hourly(&self) -> bool {
        self.wage_from.is_some_and(wage::looks_hourly)
            || self.wage_to.is_some_and(wage::looks_hourly)
    }

    /// Monthly-equivalent wage point used for wage-floor comparison.
    ///
    /// Both bounds are normalized to monthly figures first; when both are
    /// present the point is their rounded average, otherwise whichever bound
    /// exists. `None` when the offer carries no usable wage at all.
    pub fn monthly_wage_point(&self) -> Option<f64> {
        let from = self.wage_from.and_then(wage::monthly_equivalent);
        let to = self.wage_to.and_then(wage::monthly_equivalent);

        match (from, to) {
            (Some(a), Some(b)) => Some(((a + b) / 2.0).round()),
            (a, b) => a.or(b),
        }
    }

    /// Best-effort detail URL for this offer.
    ///
    /// Prefers a direct `url_adresa`, then the portal detail page derived
    /// from `portal_id`, then a numeric trailing segment of `offer_id`.
    pub fn detail_url(&self) -> Option<String> {
        let direct = self.url.trim();
        if direct.starts_with("https://") || direct.starts_with("http://") {
            return Some(direct.to_string());
        }

        if let Some(pid) = self.portal_id.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            return Some(format!("{PORTAL_DETAIL_PREFIX}{pid}"));
        }

        let short = trailing_segment(self.offer_id.trim());
        if !short.is_empty() && short.bytes().all(|b| b.is_ascii_digit()) {
            return Some(format!("{PORTAL_DETAIL_PREFIX}{short}"));
        }

        None
    }
}

/// Last `/`-separated segment of an id-like string.
fn trailing_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Accept `"123"`, `123`, `123.0`, or null for ids that vary on the wire.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

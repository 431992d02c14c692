//! Offer catalog: per-category shards aggregated into one searchable list.
//!
//! Offers arrive one shard per category tag. Shard failures are isolated:
//! a failed fetch contributes zero offers and the rest of the catalog loads
//! normally. A failed category manifest falls back to the built-in tag list.

use crate::error::Result;
use pracehub_core::Offer;
use pracehub_text::normalize;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// Boxed future returned by [`ShardSource`] fetches.
pub type ShardFuture<'a> = Pin<Box<dyn Future<Output = Result<serde_json::Value>> + Send + 'a>>;

/// Provider of the category manifest and per-category offer shards.
pub trait ShardSource: Send + Sync {
    /// Fetch the category manifest document.
    fn fetch_manifest(&self) -> ShardFuture<'_>;

    /// Fetch the offer shard for one category tag.
    fn fetch_shard<'a>(&'a self, tag: &str) -> ShardFuture<'a>;
}

/// One entry of the category manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTag {
    /// Shard tag, doubles as the shard file name.
    #[serde(default)]
    pub tag: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryManifest {
    #[serde(default)]
    categories: Vec<CategoryTag>,
}

/// Wire shape of one offer shard.
#[derive(Debug, Default, Deserialize)]
pub struct OfferShard {
    /// The shard's offers.
    #[serde(default)]
    pub offers: Vec<Offer>,
}

/// Built-in tag list used when the manifest is missing or empty.
fn fallback_tags() -> Vec<CategoryTag> {
    [
        ("auto", "Auto"),
        ("agri", "Agri"),
        ("kuchar", "Kuchař"),
        ("cisnik", "Číšník / servírka"),
        ("barman", "Barman"),
        ("ridic", "Řidič"),
        ("svarec", "Svářeč"),
    ]
    .into_iter()
    .map(|(tag, label)| CategoryTag { tag: tag.into(), label: label.into() })
    .collect()
}

/// An offer annotated with its shard and precomputed search keys.
///
/// The offer itself stays untouched; everything derived lives here.
#[derive(Debug, Clone)]
pub struct IndexedOffer {
    /// The immutable offer record.
    pub offer: Offer,
    /// Tag of the shard the offer came from.
    pub tag: String,
    /// Label of that shard.
    pub label: String,
    /// Normalized searchable text of the offer.
    pub haystack: String,
    /// Normalized title, used for collation.
    pub title_key: String,
}

impl IndexedOffer {
    /// Annotate an offer with its shard and search keys.
    pub fn new(offer: Offer, tag: &CategoryTag) -> Self {
        let haystack = searchable_text(&offer);
        let title_key = normalize(&offer.title);
        Self { offer, tag: tag.tag.clone(), label: tag.label.clone(), haystack, title_key }
    }
}

/// Normalized concatenation of an offer's searchable fields.
fn searchable_text(offer: &Offer) -> String {
    let fields = [
        offer.title.as_str(),
        offer.employer.as_str(),
        offer.locality.as_str(),
        offer.municipality.as_str(),
        offer.district.as_str(),
        offer.region_name.as_str(),
        offer.region_code.as_str(),
        offer.isco.as_str(),
    ];
    let joined = fields
        .iter()
        .filter(|f| !f.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    normalize(&joined)
}

/// All loaded offers plus the tag list that produced them.
#[derive(Debug, Default)]
pub struct OfferCatalog {
    offers: Vec<Arc<IndexedOffer>>,
    tags: Vec<CategoryTag>,
}

impl OfferCatalog {
    /// Load every category shard from the source.
    ///
    /// Never fails as a whole: manifest problems fall back to the built-in
    /// tags and each shard failure is logged and skipped.
    pub async fn load(source: &dyn ShardSource) -> Self {
        let tags = match source.fetch_manifest().await {
            Ok(raw) => match serde_json::from_value::<CategoryManifest>(raw) {
                Ok(manifest) => {
                    let mut tags: Vec<CategoryTag> = manifest
                        .categories
                        .into_iter()
                        .map(|t| CategoryTag {
                            tag: t.tag.trim().to_string(),
                            label: t.label.trim().to_string(),
                        })
                        .filter(|t| !t.tag.is_empty())
                        .collect();
                    if tags.is_empty() {
                        tags = fallback_tags();
                    }
                    tags
                }
                Err(e) => {
                    warn!(error = %e, "category manifest malformed, using built-in tags");
                    fallback_tags()
                }
            },
            Err(e) => {
                warn!(error = %e, "category manifest unavailable, using built-in tags");
                fallback_tags()
            }
        };

        let mut offers = Vec::new();
        for tag in &tags {
            let shard = match source.fetch_shard(&tag.tag).await {
                Ok(raw) => serde_json::from_value::<OfferShard>(raw),
                Err(e) => {
                    warn!(tag = %tag.tag, error = %e, "offer shard failed to load");
                    continue;
                }
            };
            match shard {
                Ok(shard) => {
                    debug!(tag = %tag.tag, count = shard.offers.len(), "offer shard loaded");
                    offers.extend(
                        shard.offers.into_iter().map(|o| Arc::new(IndexedOffer::new(o, tag))),
                    );
                }
                Err(e) => {
                    warn!(tag = %tag.tag, error = %e, "offer shard malformed");
                }
            }
        }

        Self { offers, tags }
    }

    /// Build a catalog from already-materialized offers (tests, embedding).
    pub fn from_parts(offers: Vec<IndexedOffer>, tags: Vec<CategoryTag>) -> Self {
        Self { offers: offers.into_iter().map(Arc::new).collect(), tags }
    }

    /// All offers across shards, in load order.
    pub fn offers(&self) -> &[Arc<IndexedOffer>] {
        &self.offers
    }

    /// The effective tag list.
    pub fn tags(&self) -> &[CategoryTag] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    struct FixtureSource {
        manifest_ok: bool,
        broken_shards: Vec<&'static str>,
    }

    impl ShardSource for FixtureSource {
        fn fetch_manifest(&self) -> ShardFuture<'_> {
            Box::pin(async move {
                if self.manifest_ok {
                    Ok(serde_json::json!({
                        "categories": [
                            {"tag": "auto", "label": "Auto"},
                            {"tag": "kuchar", "label": "Kuchař"},
                            {"tag": "ridic", "label": "Řidič"}
                        ]
                    }))
                } else {
                    Err(EngineError::SourceUnavailable("manifest offline".into()))
                }
            })
        }

        fn fetch_shard<'a>(&'a self, tag: &str) -> ShardFuture<'a> {
            let tag = tag.to_string();
            Box::pin(async move {
                if self.broken_shards.contains(&tag.as_str()) {
                    return Err(EngineError::SourceUnavailable(format!("{tag} offline")));
                }
                Ok(serde_json::json!({
                    "offers": [
                        {"profese": format!("{tag} pozice"), "obec": "Plzeň", "kraj": "CZ032"}
                    ]
                }))
            })
        }
    }

    #[tokio::test]
    async fn test_load_aggregates_shards() {
        let catalog = OfferCatalog::load(&FixtureSource {
            manifest_ok: true,
            broken_shards: vec![],
        })
        .await;

        assert_eq!(catalog.tags().len(), 3);
        assert_eq!(catalog.offers().len(), 3);
        let first = &catalog.offers()[0];
        assert_eq!(first.tag, "auto");
        assert!(first.haystack.contains("plzen"));
    }

    #[tokio::test]
    async fn test_failed_shard_is_isolated() {
        let catalog = OfferCatalog::load(&FixtureSource {
            manifest_ok: true,
            broken_shards: vec!["kuchar"],
        })
        .await;

        assert_eq!(catalog.tags().len(), 3);
        assert_eq!(catalog.offers().len(), 2);
        assert!(catalog.offers().iter().all(|o| o.tag != "kuchar"));
    }

    #[tokio::test]
    async fn test_manifest_fallback() {
        let catalog = OfferCatalog::load(&FixtureSource {
            manifest_ok: false,
            broken_shards: vec![],
        })
        .await;

        let tags: Vec<&str> = catalog.tags().iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["auto", "agri", "kuchar", "cisnik", "barman", "ridic", "svarec"]);
        assert_eq!(catalog.offers().len(), 7);
    }

    #[test]
    fn test_searchable_text_skips_empty_fields() {
        let offer: Offer = serde_json::from_str(
            r#"{"profese": "Automechanik", "obec": "Plzeň", "kraj": "CZ032", "cz_isco": "7231"}"#,
        )
        .unwrap();
        let indexed = IndexedOffer::new(
            offer,
            &CategoryTag { tag: "auto".into(), label: "Auto".into() },
        );
        assert_eq!(indexed.haystack, "automechanik plzen cz032 7231");
        assert_eq!(indexed.title_key, "automechanik");
    }
}

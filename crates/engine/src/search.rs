//! The search engine: filter pipeline, ranking, and run lifecycle.
//!
//! A run moves through validation, the synchronous filter stages, optional
//! asynchronous distance work, sorting, and publication. Runs are identified
//! by a strictly increasing sequence number; starting a new run supersedes
//! any in-flight older one. Every suspension point re-checks the sequence
//! and a stale run stops publishing — superseding is the only cancellation
//! mechanism, and it is silent.
//!
//! Filter stages are independent predicates, ordered cheap-first: region
//! equality, focus keywords, wage floor, free text, and finally the
//! geocoding-backed commute distance bound.

use crate::catalog::{IndexedOffer, OfferCatalog};
use crate::classify::focus_matches;
use crate::distance::DistanceCache;
use crate::pager::{Page, ResultPager};
use pracehub_core::{OriginRef, PageSize, SearchQuery};
use pracehub_geo::{Coordinate, GeoIndexService};
use pracehub_text::matches_all_tokens;
use serde::Serialize;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How many leading sorted results receive display-only distances when
    /// an origin is known but no distance bound is active.
    pub enrich_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { enrich_limit: 200 }
    }
}

/// Why a run was rejected before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// A distance bound was requested without a usable origin.
    MissingOrigin,
    /// The origin place could not be geocoded.
    UnresolvedOrigin,
}

/// Terminal status of a published run, distinct from "zero results".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// The run completed and its results are live.
    Ready,
    /// The run was rejected during validation.
    Rejected(RejectReason),
}

/// One ranked result: the offer plus its transient distance annotation.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched offer with its shard annotations.
    pub offer: Arc<IndexedOffer>,
    /// Distance from the query origin in km, when known.
    pub distance_km: Option<f64>,
}

/// What a completed run hands to the caller.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Ready or rejected.
    pub status: SearchStatus,
    /// Total number of matches across all pages.
    pub total: usize,
    /// The current page of results.
    pub page: Page<SearchHit>,
}

struct PublishedState {
    seq: u64,
    status: Option<SearchStatus>,
    results: Arc<Vec<SearchHit>>,
    pager: ResultPager,
}

impl Default for PublishedState {
    fn default() -> Self {
        Self {
            seq: 0,
            status: None,
            results: Arc::new(Vec::new()),
            pager: ResultPager::default(),
        }
    }
}

/// Cancellable, sequence-numbered search over the offer catalog.
pub struct SearchEngine {
    catalog: OfferCatalog,
    geo: Arc<GeoIndexService>,
    config: EngineConfig,
    seq: AtomicU64,
    published: Mutex<PublishedState>,
}

impl SearchEngine {
    /// Create an engine over a loaded catalog and the shared geo service.
    pub fn new(catalog: OfferCatalog, geo: Arc<GeoIndexService>, config: EngineConfig) -> Self {
        Self {
            catalog,
            geo,
            config,
            seq: AtomicU64::new(0),
            published: Mutex::new(PublishedState::default()),
        }
    }

    /// The catalog this engine searches.
    pub fn catalog(&self) -> &OfferCatalog {
        &self.catalog
    }

    /// Run a search. Returns `None` when the run was superseded by a newer
    /// one before it could publish; stale runs are not errors.
    ///
    /// A successful (or rejected) run publishes its results, resets paging
    /// to page 1, and returns the first page.
    pub async fn search(&self, query: SearchQuery) -> Option<SearchOutcome> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, "search run started");

        let wants_distance = query.wants_distance_filter();

        // Validation: a distance bound needs a usable, geocodable origin.
        let filter_origin: Option<Coordinate> = if wants_distance {
            let Some(origin_ref) = query.origin.as_ref().filter(|o| o.is_usable()) else {
                return self.publish(seq, SearchStatus::Rejected(RejectReason::MissingOrigin), Vec::new());
            };
            let resolved = self.resolve_origin(origin_ref).await;
            if !self.is_current(seq) {
                debug!(seq, "superseded during origin resolution");
                return None;
            }
            match resolved {
                Some(point) => Some(point),
                None => {
                    return self.publish(
                        seq,
                        SearchStatus::Rejected(RejectReason::UnresolvedOrigin),
                        Vec::new(),
                    );
                }
            }
        } else {
            None
        };

        // Synchronous filter stages.
        let region = query.region.as_deref().map(str::trim).filter(|r| !r.is_empty());
        let focus = query.focus.as_deref().map(str::trim).filter(|f| !f.is_empty());
        let wage_floor = query.wage_floor.filter(|w| *w > 0.0);
        let text = query.text.trim();

        let filtered: Vec<Arc<IndexedOffer>> = self
            .catalog
            .offers()
            .iter()
            .filter(|o| region.is_none_or(|r| o.offer.region_code.trim() == r))
            .filter(|o| focus.is_none_or(|f| focus_matches(&o.haystack, f)))
            .filter(|o| {
                wage_floor.is_none_or(|floor| {
                    o.offer.monthly_wage_point().is_some_and(|w| w >= floor)
                })
            })
            .filter(|o| text.is_empty() || matches_all_tokens(&o.haystack, text))
            .cloned()
            .collect();

        // Distance bound: drop offers whose distance is unknown or too far.
        let mut hits: Vec<SearchHit> = match (wants_distance, filter_origin) {
            (true, Some(origin)) => {
                let max_km = query.max_distance_km.unwrap_or(0.0);
                let mut cache = DistanceCache::new(Arc::clone(&self.geo));
                let mut kept = Vec::with_capacity(filtered.len());
                for offer in filtered {
                    let distance = cache.distance_km(&offer.offer, &origin).await;
                    if !self.is_current(seq) {
                        debug!(seq, "superseded during distance filtering");
                        return None;
                    }
                    let Some(distance) = distance else { continue };
                    if distance <= max_km {
                        kept.push(SearchHit { offer, distance_km: Some(distance) });
                    }
                }
                kept
            }
            _ => filtered
                .into_iter()
                .map(|offer| SearchHit { offer, distance_km: None })
                .collect(),
        };

        // Newest first; stable tie-break on the diacritic-stripped title.
        hits.sort_by(compare_hits);

        // Display-only enrichment: attach distances to a bounded prefix when
        // the origin resolves but no bound was requested. Never filters or
        // reorders.
        if !wants_distance && query.has_usable_origin() {
            if let Some(origin_ref) = query.origin.as_ref() {
                let resolved = self.resolve_origin(origin_ref).await;
                if !self.is_current(seq) {
                    debug!(seq, "superseded during origin resolution");
                    return None;
                }
                if let Some(origin) = resolved {
                    let mut cache = DistanceCache::new(Arc::clone(&self.geo));
                    let limit = self.config.enrich_limit.min(hits.len());
                    for hit in &mut hits[..limit] {
                        let distance = cache.distance_km(&hit.offer.offer, &origin).await;
                        if !self.is_current(seq) {
                            debug!(seq, "superseded during distance enrichment");
                            return None;
                        }
                        hit.distance_km = distance;
                    }
                }
            }
        }

        self.publish(seq, SearchStatus::Ready, hits)
    }

    /// Re-slice the last published run at a different page.
    pub fn page(&self, page: usize) -> Option<SearchOutcome> {
        let mut state = self.lock_published();
        state.pager.set_page(page);
        outcome_of(&state)
    }

    /// Change the page size; paging returns to page 1.
    pub fn set_page_size(&self, size: PageSize) -> Option<SearchOutcome> {
        let mut state = self.lock_published();
        state.pager.set_size(size);
        outcome_of(&state)
    }

    /// The last published outcome at the current paging position.
    pub fn current(&self) -> Option<SearchOutcome> {
        outcome_of(&self.lock_published())
    }

    fn is_current(&self, seq: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == seq
    }

    async fn resolve_origin(&self, origin: &OriginRef) -> Option<Coordinate> {
        match origin {
            OriginRef::Key(key) => self.geo.lookup_by_key(key).await,
            OriginRef::Name { name, region } => {
                self.geo.lookup_by_name(name, region.as_deref()).await
            }
        }
    }

    fn lock_published(&self) -> std::sync::MutexGuard<'_, PublishedState> {
        self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a finished run unless a newer one got there first.
    fn publish(
        &self,
        seq: u64,
        status: SearchStatus,
        hits: Vec<SearchHit>,
    ) -> Option<SearchOutcome> {
        if !self.is_current(seq) {
            debug!(seq, "superseded before publication");
            return None;
        }
        let mut state = self.lock_published();
        if state.seq > seq {
            return None;
        }
        state.seq = seq;
        state.status = Some(status);
        state.results = Arc::new(hits);
        state.pager.reset();
        debug!(seq, total = state.results.len(), ?status, "search run published");
        outcome_of(&state)
    }
}

fn outcome_of(state: &PublishedState) -> Option<SearchOutcome> {
    let status = state.status?;
    Some(SearchOutcome {
        status,
        total: state.results.len(),
        page: state.pager.slice(&state.results),
    })
}

/// Descending insertion date (fixed-width ISO strings), then title.
fn compare_hits(a: &SearchHit, b: &SearchHit) -> CmpOrdering {
    b.offer
        .offer
        .inserted_at
        .cmp(&a.offer.offer.inserted_at)
        .then_with(|| a.offer.title_key.cmp(&b.offer.title_key))
        .then_with(|| a.offer.offer.title.cmp(&b.offer.offer.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryTag;
    use pracehub_geo::{CentroidSource, FetchFuture};
    use tokio::sync::Notify;

    fn indexed(raw: serde_json::Value, tag: &CategoryTag) -> IndexedOffer {
        IndexedOffer::new(serde_json::from_value(raw).unwrap(), tag)
    }

    fn fixture_catalog() -> OfferCatalog {
        let auto = CategoryTag { tag: "auto".into(), label: "Auto".into() };
        let kuchar = CategoryTag { tag: "kuchar".into(), label: "Kuchař".into() };
        let offers = vec![
            indexed(
                serde_json::json!({
                    "profese": "Automechanik", "obec": "Plzeň", "kraj": "CZ032",
                    "kraj_nazev": "Plzeňský kraj",
                    "mzda_od": 30000, "mzda_do": 34000, "datum": "2025-06-02"
                }),
                &auto,
            ),
            indexed(
                serde_json::json!({
                    "profese": "Automechanik nákladních vozidel", "obec": "Bor", "kraj": "CZ032",
                    "kraj_nazev": "Plzeňský kraj",
                    "mzda_od": 28000, "datum": "2025-06-05"
                }),
                &auto,
            ),
            indexed(
                serde_json::json!({
                    "profese": "Automechanik", "obec": "Praha", "kraj": "CZ010",
                    "kraj_nazev": "Hlavní město Praha",
                    "mzda_od": 40000, "datum": "2025-06-03"
                }),
                &auto,
            ),
            indexed(
                serde_json::json!({
                    "profese": "Automechanik", "obec": "Klatovy", "kraj": "CZ032",
                    "kraj_nazev": "Plzeňský kraj",
                    "mzda_od": 25000, "datum": "2025-06-04"
                }),
                &auto,
            ),
            indexed(
                serde_json::json!({
                    "profese": "Automechanik", "obec": "Neznámov", "kraj": "CZ032",
                    "kraj_nazev": "Plzeňský kraj",
                    "mzda_od": 29000, "datum": "2025-06-06"
                }),
                &auto,
            ),
            indexed(
                serde_json::json!({
                    "profese": "Kuchař", "obec": "Plzeň", "kraj": "CZ032",
                    "kraj_nazev": "Plzeňský kraj",
                    "mzda_od": 150, "datum": "2025-06-01"
                }),
                &kuchar,
            ),
        ];
        OfferCatalog::from_parts(offers, vec![auto, kuchar])
    }

    fn centroid_fixture() -> serde_json::Value {
        serde_json::json!({
            "byKey": {
                "obec:plzen": {"n": "Plzeň", "k": "CZ032", "t": "obec", "lat": 49.7384, "lon": 13.3736}
            },
            "byName": {
                "plzen": [{"lat": 49.7384, "lon": 13.3736}],
                "bor": [{"lat": 49.7112, "lon": 12.7753}],
                "klatovy": [{"lat": 49.3953, "lon": 13.2951}],
                "praha": [{"lat": 50.0755, "lon": 14.4378}]
            }
        })
    }

    struct StaticSource;

    impl CentroidSource for StaticSource {
        fn fetch_index(&self) -> FetchFuture<'_> {
            Box::pin(async move { Ok(centroid_fixture()) })
        }
    }

    /// Source that parks the index load until released, and reports when the
    /// load has started.
    struct GatedSource {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl CentroidSource for GatedSource {
        fn fetch_index(&self) -> FetchFuture<'_> {
            Box::pin(async move {
                self.started.notify_one();
                self.release.notified().await;
                Ok(centroid_fixture())
            })
        }
    }

    fn engine() -> SearchEngine {
        SearchEngine::new(
            fixture_catalog(),
            Arc::new(GeoIndexService::new(StaticSource)),
            EngineConfig::default(),
        )
    }

    fn titles(outcome: &SearchOutcome) -> Vec<String> {
        outcome.page.items.iter().map(|h| h.offer.offer.title.clone()).collect()
    }

    fn cities(outcome: &SearchOutcome) -> Vec<String> {
        outcome.page.items.iter().map(|h| h.offer.offer.municipality.clone()).collect()
    }

    #[tokio::test]
    async fn test_end_to_end_text_region_wage() {
        let engine = engine();
        let outcome = engine
            .search(SearchQuery {
                text: "automechanik".into(),
                region: Some("CZ032".into()),
                wage_floor: Some(28000.0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome.status, SearchStatus::Ready);
        // Klatovy is under the floor, Praha is outside the region, Kuchař
        // fails the text match; newest first.
        assert_eq!(cities(&outcome), vec!["Neznámov", "Bor", "Plzeň"]);
        assert_eq!(outcome.total, 3);
    }

    #[tokio::test]
    async fn test_hourly_wage_normalized_for_floor() {
        let engine = engine();
        // 150 Kč/h ≈ 26 000 Kč/month: passes a 25k floor, fails a 28k one.
        let outcome = engine
            .search(SearchQuery {
                text: "kuchar".into(),
                wage_floor: Some(25000.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome.total, 1);

        let outcome = engine
            .search(SearchQuery {
                text: "kuchar".into(),
                wage_floor: Some(28000.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.status, SearchStatus::Ready);
    }

    #[tokio::test]
    async fn test_focus_filter() {
        let engine = engine();
        // "ridicC" keywords include "naklad", hitting the truck mechanic.
        let outcome = engine
            .search(SearchQuery { focus: Some("ridicC".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(titles(&outcome), vec!["Automechanik nákladních vozidel"]);
    }

    #[tokio::test]
    async fn test_distance_bound_filters_and_drops_unresolved() {
        let engine = engine();
        let outcome = engine
            .search(SearchQuery {
                text: "automechanik".into(),
                origin: Some(OriginRef::Name { name: "Plzeň".into(), region: None }),
                max_distance_km: Some(50.0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome.status, SearchStatus::Ready);
        // Praha is ~84 km away; Neznámov cannot be geocoded and is dropped
        // under an active bound. Order stays newest-first.
        assert_eq!(cities(&outcome), vec!["Bor", "Klatovy", "Plzeň"]);
        for hit in &outcome.page.items {
            let d = hit.distance_km.unwrap();
            assert!(d <= 50.0, "distance {d} over bound");
        }
    }

    #[tokio::test]
    async fn test_origin_by_key() {
        let engine = engine();
        let outcome = engine
            .search(SearchQuery {
                text: "automechanik".into(),
                origin: Some(OriginRef::Key("obec:plzen".into())),
                max_distance_km: Some(10.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cities(&outcome), vec!["Plzeň"]);
    }

    #[tokio::test]
    async fn test_rejected_missing_origin() {
        let engine = engine();
        let outcome = engine
            .search(SearchQuery { max_distance_km: Some(30.0), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(outcome.status, SearchStatus::Rejected(RejectReason::MissingOrigin));
        assert_eq!(outcome.total, 0);

        // A one-character origin is not usable either.
        let outcome = engine
            .search(SearchQuery {
                origin: Some(OriginRef::Name { name: "B".into(), region: None }),
                max_distance_km: Some(30.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome.status, SearchStatus::Rejected(RejectReason::MissingOrigin));
    }

    #[tokio::test]
    async fn test_rejected_unresolved_origin() {
        let engine = engine();
        let outcome = engine
            .search(SearchQuery {
                origin: Some(OriginRef::Name { name: "Atlantis".into(), region: None }),
                max_distance_km: Some(30.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome.status, SearchStatus::Rejected(RejectReason::UnresolvedOrigin));
        assert_eq!(outcome.total, 0);
    }

    #[tokio::test]
    async fn test_enrichment_is_bounded_and_order_preserving() {
        let engine = SearchEngine::new(
            fixture_catalog(),
            Arc::new(GeoIndexService::new(StaticSource)),
            EngineConfig { enrich_limit: 2 },
        );
        let outcome = engine
            .search(SearchQuery {
                text: "automechanik".into(),
                origin: Some(OriginRef::Name { name: "Plzeň".into(), region: None }),
                ..Default::default()
            })
            .await
            .unwrap();

        // No bound: nothing is dropped, order is pure date-descending.
        assert_eq!(cities(&outcome), vec!["Neznámov", "Bor", "Klatovy", "Praha", "Plzeň"]);
        // Only the first two entries carry distances; Neznámov has no
        // coordinates, so its annotation stays empty even inside the cap.
        assert_eq!(outcome.page.items[0].distance_km, None);
        assert!(outcome.page.items[1].distance_km.is_some());
        assert_eq!(outcome.page.items[2].distance_km, None);
        assert_eq!(outcome.page.items[3].distance_km, None);
    }

    #[tokio::test]
    async fn test_paging_over_published_run() {
        let engine = engine();
        let outcome = engine.search(SearchQuery::default()).await.unwrap();
        assert_eq!(outcome.total, 6);
        assert_eq!(outcome.page.page, 1);
        assert_eq!(outcome.page.total_pages, 1);

        let outcome = engine.set_page_size(PageSize::Limit(2)).unwrap();
        assert_eq!(outcome.page.total_pages, 3);
        assert_eq!(outcome.page.page, 1);
        assert_eq!(outcome.page.items.len(), 2);

        let outcome = engine.page(99).unwrap();
        assert_eq!(outcome.page.page, 3);

        // A new search returns to page 1 but keeps the page size.
        let outcome = engine
            .search(SearchQuery { text: "automechanik".into(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(outcome.page.page, 1);
        assert_eq!(outcome.page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_no_publication_before_first_run() {
        let engine = engine();
        assert!(engine.current().is_none());
        assert!(engine.page(1).is_none());
    }

    #[tokio::test]
    async fn test_superseded_run_never_overwrites() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let engine = Arc::new(SearchEngine::new(
            fixture_catalog(),
            Arc::new(GeoIndexService::new(GatedSource {
                started: Arc::clone(&started),
                release: Arc::clone(&release),
            })),
            EngineConfig::default(),
        ));

        // Slow run: needs the geo index, which is parked behind the gate.
        let slow = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .search(SearchQuery {
                        text: "automechanik".into(),
                        origin: Some(OriginRef::Name { name: "Plzeň".into(), region: None }),
                        max_distance_km: Some(50.0),
                        ..Default::default()
                    })
                    .await
            })
        };
        started.notified().await;

        // Fast run: no geocoding, publishes immediately.
        let fast = engine
            .search(SearchQuery { text: "kuchar".into(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(titles(&fast), vec!["Kuchař"]);

        // Let the slow run finish its suspended lookup: it must discard
        // itself instead of publishing.
        release.notify_one();
        let slow_result = slow.await.unwrap();
        assert!(slow_result.is_none());

        let current = engine.current().unwrap();
        assert_eq!(current.status, SearchStatus::Ready);
        assert_eq!(titles(&current), vec!["Kuchař"]);
    }
}

//! Lazily-loaded centroid index service.
//!
//! The index file is fetched at most once per process. Concurrent first
//! callers share the single in-flight load; a failed load is remembered and
//! every subsequent lookup degrades to a miss instead of retrying or
//! erroring.

use crate::{Coordinate, GeoIndex};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Boxed future returned by [`CentroidSource::fetch_index`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = crate::Result<serde_json::Value>> + Send + 'a>>;

/// Provider of the raw centroid index document.
///
/// The core performs no I/O of its own; the embedding application supplies
/// the bytes however it obtains them (static file, HTTP fetch, test
/// fixture).
pub trait CentroidSource: Send + Sync {
    /// Fetch the raw JSON document of the centroid index.
    fn fetch_index(&self) -> FetchFuture<'_>;
}

/// Observable load state of the index service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load attempted yet.
    Unloaded,
    /// A load is in flight.
    Loading,
    /// The index is loaded and serving lookups.
    Loaded,
    /// The load failed; lookups return `None`.
    Failed,
}

const STATE_UNLOADED: u8 = 0;
const STATE_LOADING: u8 = 1;
const STATE_LOADED: u8 = 2;
const STATE_FAILED: u8 = 3;

/// Shared, load-once access to the centroid index.
pub struct GeoIndexService {
    source: Box<dyn CentroidSource>,
    cell: OnceCell<Option<Arc<GeoIndex>>>,
    state: AtomicU8,
}

impl GeoIndexService {
    /// Create a service over the given source. Nothing is fetched yet.
    pub fn new(source: impl CentroidSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cell: OnceCell::new(),
            state: AtomicU8::new(STATE_UNLOADED),
        }
    }

    /// Current load state.
    pub fn state(&self) -> LoadState {
        match self.state.load(Ordering::Acquire) {
            STATE_LOADING => LoadState::Loading,
            STATE_LOADED => LoadState::Loaded,
            STATE_FAILED => LoadState::Failed,
            _ => LoadState::Unloaded,
        }
    }

    /// The loaded index, triggering the one-time load if needed.
    ///
    /// `None` means the load failed; the failure is sticky.
    pub async fn index(&self) -> Option<Arc<GeoIndex>> {
        self.cell
            .get_or_init(|| async {
                self.state.store(STATE_LOADING, Ordering::Release);
                let loaded = match self.source.fetch_index().await {
                    Ok(raw) => GeoIndex::from_value(raw),
                    Err(e) => Err(e),
                };
                match loaded {
                    Ok(index) => {
                        debug!(places = index.len(), "centroid index loaded");
                        self.state.store(STATE_LOADED, Ordering::Release);
                        Some(Arc::new(index))
                    }
                    Err(e) => {
                        warn!(error = %e, "centroid index load failed; place lookups degrade to misses");
                        self.state.store(STATE_FAILED, Ordering::Release);
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// Resolve a place by name, optionally scoped to a region.
    pub async fn lookup_by_name(&self, name: &str, region: Option<&str>) -> Option<Coordinate> {
        self.index().await?.lookup_by_name(name, region)
    }

    /// Resolve a place by its opaque key.
    pub async fn lookup_by_key(&self, key: &str) -> Option<Coordinate> {
        self.index().await?.lookup_by_key(key)
    }
}

impl std::fmt::Debug for GeoIndexService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoIndexService")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

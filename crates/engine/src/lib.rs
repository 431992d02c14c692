//! Offer filtering, classification, ranking, and pagination for Pracehub.
//!
//! This crate is the orchestration layer over the Pracehub matching core:
//!
//! - **Classifier**: program name → occupation category, focus keyword sets,
//!   role recommendations
//! - **Catalog**: per-category offer shards aggregated with per-shard
//!   failure isolation
//! - **Distance cache**: per-run memoization of offer → origin distances
//! - **Search engine**: the region → focus → wage → text → distance filter
//!   pipeline with sequence-numbered, cooperatively cancelled runs
//! - **Result pager**: stable paging over the last published run
//!
//! The engine performs no I/O of its own; offer shards and the geo index
//! arrive through the [`ShardSource`] and
//! [`CentroidSource`](pracehub_geo::CentroidSource) traits.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod catalog;
mod classify;
mod distance;
mod error;
mod pager;
mod search;

pub use catalog::{
    CategoryTag, IndexedOffer, OfferCatalog, OfferShard, ShardFuture, ShardSource,
};
pub use classify::{
    category_for_program, classify, focus_matches, focuses_for, recommended_roles,
    Category, Classification, Focus, Program, Role, School, SchoolIndex,
};
pub use distance::DistanceCache;
pub use error::{EngineError, Result};
pub use pager::{paginate, Page, ResultPager};
pub use search::{
    EngineConfig, RejectReason, SearchEngine, SearchHit, SearchOutcome, SearchStatus,
};

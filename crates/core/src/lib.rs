//! Shared data model for the Pracehub offer-matching core.
//!
//! This crate provides the types every other Pracehub crate agrees on:
//!
//! - **Offers**: the immutable job-offer record as delivered by the daily
//!   data build, with Czech wire field names
//! - **Wages**: the hourly-vs-monthly heuristic and monthly-equivalent
//!   normalization used by wage-floor filtering
//! - **Regions**: the fixed table of CZ NUTS-3 regions (kraje)
//! - **Queries**: the filter parameter set accepted by the search engine
//! - **Paging**: page-size/total-page arithmetic shared by the result pager

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod offer;
pub mod page;
pub mod query;
pub mod region;
pub mod wage;

pub use offer::Offer;
pub use page::{page_bounds, total_pages, PageSize};
pub use query::{OriginRef, SearchQuery};
pub use region::{region_name, region_short, Region, CZ_REGIONS};
pub use wage::{looks_hourly, monthly_equivalent, HOURLY_WAGE_MAX, HOURS_PER_MONTH};

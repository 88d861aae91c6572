//! Catalog Module
//!
//! The proxied movie-catalog operations and the cache-fronted service that
//! executes them.

mod filters;
mod operation;
mod service;

pub use filters::{ListingFilters, SortType, DEFAULT_PAGE};
pub use operation::{ImageRedirect, ListType, Operation};
pub use service::{CachedPayload, CatalogService};

//! 4AMotos Core - Shared catalog logic.
//!
//! This crate provides the types and pure logic used across all 4AMotos
//! components:
//! - `storefront` - Public-facing catalog, shop and cart API
//! - `cli` - Seeding and schema tooling for the record store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Everything here operates on in-memory snapshots
//! fetched by the storefront.
//!
//! # Modules
//!
//! - [`types`] - Record ids, prices, items, categories and store status
//! - [`filter`] - Search criteria and the store filter-expression builder
//! - [`facets`] - Category, brand and price-bucket facet aggregation
//! - [`cart`] - Ordered cart value with merge-on-add semantics
//! - [`text`] - Accent folding and Spanish-aware label ordering

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod facets;
pub mod filter;
pub mod text;
pub mod types;

pub use cart::{Cart, CartEntry};
pub use facets::{BrandFacet, CategoryFacet, FacetBasis, Facets, PriceBucket, PriceFacet};
pub use filter::{FilterExpr, SearchFilters, SortOrder};
pub use types::*;

//! PocketBase record store client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; every call is a direct request, nothing is
//!   cached or synced locally
//! - The store is the source of truth for items and categories
//! - Error bodies (`{code, message, data}`) are parsed into [`StoreError::Api`]
//!
//! # Example
//!
//! ```rust,ignore
//! use amotos_storefront::pocketbase::{ListQuery, PocketBaseClient};
//!
//! let client = PocketBaseClient::new(&config.pocketbase)?;
//!
//! let page = client
//!     .list::<Item>(collections::ITEMS, &ListQuery::page(1, 24).sort("-created"))
//!     .await?;
//! ```

pub mod admin;
mod client;
pub mod types;

pub use client::PocketBaseClient;
pub use types::*;

use thiserror::Error;

/// Collection names in the store.
pub mod collections {
    pub const ITEMS: &str = "repuestos";
    pub const CATEGORIES: &str = "categorias";
    pub const SUPERUSERS: &str = "_superusers";
}

/// Errors that can occur when talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Store error {status}: {message}")]
    Api { status: u16, message: String },

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the store.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl StoreError {
    /// Whether this error means the record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

//! Page data loaders.
//!
//! Each loader turns URL parameters into store calls and assembles the data
//! a page renders. Loaders do not fail on transient store errors: they fall
//! back to empty values (see [`fallback`]) and attach a visitor-facing
//! message. Only "record does not exist" is surfaced as an error.
//!
//! # Loaders
//!
//! - [`shop::load_shop`] - `/tienda`, search with facets
//! - [`products::load_listing`] - `/productos`
//! - [`products::load_detail`] - `/productos/{id}`
//! - [`products::load_edit`] - `/productos/{id}/editar`
//! - [`products::load_new`] - `/productos/nuevo`

pub mod fallback;
pub mod products;
pub mod query;
pub mod shop;

pub use fallback::{Guarded, LoadFailure, guarded, guarded_or};
pub use products::{
    EditPage, ListingPage, NewPage, ProductNotFound, ProductPage, load_detail, load_edit,
    load_listing, load_new,
};
pub use query::{ListingQuery, ShopQuery};
pub use shop::{ShopPage, load_shop};

/// `max(1, ceil(total_items / per_page))`.
#[must_use]
pub fn total_pages(total_items: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 1;
    }
    total_items.div_ceil(u64::from(per_page)).max(1)
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory catalog for loader tests.

    use std::sync::{Mutex, PoisonError};

    use amotos_core::{Category, Item, ItemId, SearchFilters};

    use crate::catalog::CatalogStore;
    use crate::pocketbase::{ListResult, StoreError};

    /// Serves fixed items and categories, records every search, and can be
    /// switched to fail every call.
    pub struct FakeCatalog {
        items: Vec<Item>,
        categories: Vec<Category>,
        failing: bool,
        searches: Mutex<Vec<(SearchFilters, u32, u32)>>,
    }

    impl FakeCatalog {
        pub fn new(items: Vec<Item>, categories: Vec<Category>) -> Self {
            Self {
                items,
                categories,
                failing: false,
                searches: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::new(Vec::new(), Vec::new())
            }
        }

        pub fn searches(&self) -> Vec<(SearchFilters, u32, u32)> {
            self.searches
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        fn outage() -> StoreError {
            StoreError::Api {
                status: 503,
                message: "store offline".to_string(),
            }
        }
    }

    impl CatalogStore for FakeCatalog {
        async fn search_items(
            &self,
            filters: &SearchFilters,
            page: u32,
            per_page: u32,
        ) -> Result<ListResult<Item>, StoreError> {
            self.searches
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((filters.clone(), page, per_page));
            if self.failing {
                return Err(Self::outage());
            }

            let start = usize::try_from((page.saturating_sub(1)) * per_page).unwrap_or(usize::MAX);
            let items: Vec<Item> = self
                .items
                .iter()
                .skip(start)
                .take(usize::try_from(per_page).unwrap_or(usize::MAX))
                .cloned()
                .collect();
            let total_items = self.items.len() as u64;
            Ok(ListResult {
                page,
                per_page,
                total_items,
                total_pages: u32::try_from(super::total_pages(total_items, per_page))
                    .unwrap_or(u32::MAX),
                items,
            })
        }

        async fn get_item(&self, id: &ItemId, expand_category: bool) -> Result<Item, StoreError> {
            if self.failing {
                return Err(Self::outage());
            }
            let mut item = self
                .items
                .iter()
                .find(|i| &i.id == id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(format!("repuestos/{id}")))?;
            if expand_category {
                let category = self.categories.iter().find(|c| c.id == item.category).cloned();
                item.expand = Some(amotos_core::ItemExpand { category });
            }
            Ok(item)
        }

        async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
            if self.failing {
                return Err(Self::outage());
            }
            Ok(self.categories.clone())
        }
    }
}

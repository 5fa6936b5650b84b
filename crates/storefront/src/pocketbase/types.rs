//! Wire types for the record store's REST API.

use serde::{Deserialize, Serialize};

/// One page of records as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub items: Vec<T>,
}

impl<T> ListResult<T> {
    /// An empty page, used as the fallback when a fetch fails.
    #[must_use]
    pub const fn empty(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            total_items: 0,
            total_pages: 0,
            items: Vec::new(),
        }
    }
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self::empty(1, 0)
    }
}

/// Parameters for the list endpoint. Unset fields are omitted from the query
/// string so the store applies its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    /// Query for one page of `per_page` records.
    #[must_use]
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    /// Set the filter expression; an empty expression is dropped.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = (!filter.is_empty()).then_some(filter);
        self
    }

    /// Set the sort directive.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Query-string pairs in the store's parameter names.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("perPage", per_page.to_string()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    pub code: u16,
    pub message: String,
}

impl HealthResponse {
    /// The store counts as up when it reports code 200 or message `OK`.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.code == 200 || self.message == "OK"
    }
}

/// Error body returned by the store on non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub code: u16,
    pub message: String,
    pub data: serde_json::Value,
}

//! REST client for the record store.

use std::sync::Arc;

use amotos_core::{Category, CategoryDraft, Item, ItemDraft, ItemId};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::types::{ApiErrorBody, HealthResponse, ListQuery, ListResult};
use super::{StoreError, collections};
use crate::config::PocketBaseConfig;

/// Page size used when walking a whole collection.
const FULL_LIST_PAGE_SIZE: u32 = 500;

/// Characters of a response body kept in logs and error messages.
const LOG_BODY_CHARS: usize = 500;

// =============================================================================
// PocketBaseClient
// =============================================================================

/// Client for the record store's REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct PocketBaseClient {
    inner: Arc<PocketBaseClientInner>,
}

struct PocketBaseClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl PocketBaseClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Http` if the HTTP client cannot be built.
    pub fn new(config: &PocketBaseConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(PocketBaseClientInner {
                client,
                base_url: config.url.clone(),
                token: config.token.clone(),
            }),
        })
    }

    /// A client sharing this one's connection pool but sending `token`.
    #[must_use]
    pub fn with_token(&self, token: SecretString) -> Self {
        Self {
            inner: Arc::new(PocketBaseClientInner {
                client: self.inner.client.clone(),
                base_url: self.inner.base_url.clone(),
                token: Some(token),
            }),
        }
    }

    /// The store host as shown to users: the base URL without its scheme.
    #[must_use]
    pub fn display_host(&self) -> String {
        let url = self.inner.base_url.as_str();
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        without_scheme.trim_end_matches('/').to_string()
    }

    /// Build `{base}/api/{segments...}`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                StoreError::Url(format!("{} cannot be a base URL", self.inner.base_url))
            })?;
            path.pop_if_empty().push("api").extend(segments);
        }
        Ok(url)
    }

    fn records_endpoint(&self, collection: &str) -> Result<Url, StoreError> {
        self.endpoint(&["collections", collection, "records"])
    }

    fn record_endpoint(&self, collection: &str, id: &str) -> Result<Url, StoreError> {
        self.endpoint(&["collections", collection, "records", id])
    }

    /// The underlying HTTP client.
    pub(super) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Send a request and return the body of a successful response.
    pub(super) async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<String, StoreError> {
        let request = match &self.inner.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StoreError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            let truncated: String = body.chars().take(LOG_BODY_CHARS).collect();
            tracing::error!(
                status = %status,
                resource,
                body = %truncated,
                "Record store returned non-success status"
            );
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or(truncated);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Send a request and decode the JSON body.
    pub(super) async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, StoreError> {
        let body = self.execute(request, resource).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                resource,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse record store response"
            );
            StoreError::Decode(e)
        })
    }

    // =========================================================================
    // Generic record operations
    // =========================================================================

    /// Fetch one page of records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the request fails or the body does not decode.
    #[instrument(skip(self, query), fields(page = ?query.page, filter = ?query.filter))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<ListResult<T>, StoreError> {
        let url = self.records_endpoint(collection)?;
        let request = self.inner.client.get(url).query(&query.to_pairs());
        self.send(request, collection).await
    }

    /// Fetch every record matching `query`, walking pages until the last one.
    /// `page` and `per_page` in `query` are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` encountered.
    #[instrument(skip(self, query))]
    pub async fn full_list<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: ListQuery,
    ) -> Result<Vec<T>, StoreError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let query = ListQuery {
                page: Some(page),
                per_page: Some(FULL_LIST_PAGE_SIZE),
                ..query.clone()
            };
            let result: ListResult<T> = self.list(collection, &query).await?;
            let fetched = result.items.len();
            records.extend(result.items);
            if fetched == 0 || page >= result.total_pages {
                break;
            }
            page += 1;
        }
        Ok(records)
    }

    /// Fetch one record by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record does not exist.
    #[instrument(skip(self))]
    pub async fn get_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        expand: Option<&str>,
    ) -> Result<T, StoreError> {
        let url = self.record_endpoint(collection, id)?;
        let mut request = self.inner.client.get(url);
        if let Some(expand) = expand {
            request = request.query(&[("expand", expand)]);
        }
        self.send(request, &format!("{collection}/{id}")).await
    }

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store rejects the payload.
    #[instrument(skip(self, body))]
    pub async fn create<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        collection: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.records_endpoint(collection)?;
        let request = self.inner.client.post(url).json(body);
        self.send(request, collection).await
    }

    /// Update a record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record does not exist.
    #[instrument(skip(self, body))]
    pub async fn update<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.record_endpoint(collection, id)?;
        let request = self.inner.client.patch(url).json(body);
        self.send(request, &format!("{collection}/{id}")).await
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.record_endpoint(collection, id)?;
        let request = self.inner.client.delete(url);
        self.execute(request, &format!("{collection}/{id}"))
            .await
            .map(drop)
    }

    /// Query the store's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store is unreachable or answers with an
    /// error status.
    pub async fn health(&self) -> Result<HealthResponse, StoreError> {
        let url = self.endpoint(&["health"])?;
        let request = self.inner.client.get(url);
        self.send(request, "health").await
    }

    // =========================================================================
    // Typed catalog writes
    // =========================================================================

    /// Create an item after local validation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store rejects the payload.
    pub async fn create_item(&self, draft: &ItemDraft) -> Result<Item, StoreError> {
        self.create(collections::ITEMS, draft).await
    }

    /// Update an item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub async fn update_item(&self, id: &ItemId, draft: &ItemDraft) -> Result<Item, StoreError> {
        self.update(collections::ITEMS, id.as_str(), draft).await
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub async fn delete_item(&self, id: &ItemId) -> Result<(), StoreError> {
        self.delete(collections::ITEMS, id.as_str()).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store rejects the payload.
    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, StoreError> {
        self.create(collections::CATEGORIES, draft).await
    }

    /// Every category, in store order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any page fails.
    pub async fn all_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.full_list(collections::CATEGORIES, ListQuery::default())
            .await
    }
}

impl std::fmt::Debug for PocketBaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PocketBaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> PocketBaseClient {
        PocketBaseClient::new(&PocketBaseConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("http://127.0.0.1:8090");
        let url = client.records_endpoint("repuestos").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8090/api/collections/repuestos/records"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_ids() {
        let client = client("https://example.org/pb/");
        let url = client.record_endpoint("repuestos", "a/b c").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/pb/api/collections/repuestos/records/a%2Fb%20c"
        );
    }

    #[test]
    fn test_display_host_strips_scheme() {
        assert_eq!(client("http://127.0.0.1:8090").display_host(), "127.0.0.1:8090");
        assert_eq!(client("https://pb.4amotos.cl/").display_host(), "pb.4amotos.cl");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = client("http://127.0.0.1:8090").with_token(SecretString::from("tok_live_123"));
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok_live_123"));
    }
}

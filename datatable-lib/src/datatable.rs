//! Fetch and export bound to one endpoint

use std::sync::Arc;

use log::debug;
use log::warn;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::http::HttpClientRegistry;
use crate::http::HttpResponse;
use crate::http::RequestConfig;
use crate::http::ResponseType;
use crate::query::Page;
use crate::query::RequestParams;
use crate::store::DatatableStore;
use crate::store::TablePatch;

/// Data access for one table endpoint.
///
/// Every call resolves the client from the registry at call time, so a
/// `Datatable` may be created before the host registers its client. Calls
/// are independent: no de-duplication, no cancellation, no retry.
///
/// This handle is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use datatable_lib::Datatable;
/// use datatable_lib::query::RequestParams;
///
/// let users = Datatable::new("users", registry.clone());
/// let page = users.fetch_data::<User>(&RequestParams::new(0, 10)).await?;
/// println!("{} of {}", page.data.len(), page.total);
/// ```
#[derive(Debug, Clone)]
pub struct Datatable {
    inner: Arc<DatatableInner>,
}

#[derive(Debug)]
struct DatatableInner {
    endpoint: String,
    registry: Arc<HttpClientRegistry>,
}

impl Datatable {
    /// Creates a handle for `endpoint` using the given registry.
    pub fn new(endpoint: impl Into<String>, registry: Arc<HttpClientRegistry>) -> Self {
        Self {
            inner: Arc::new(DatatableInner {
                endpoint: endpoint.into(),
                registry,
            }),
        }
    }

    /// Creates a handle for `endpoint` using [`HttpClientRegistry::global`].
    pub fn with_global_registry(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, HttpClientRegistry::global())
    }

    /// Returns the endpoint path.
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Fetches one page of rows.
    ///
    /// Issues `GET endpoint` with `params` as the query string and decodes the
    /// `{data, total}` envelope. Client errors are returned unchanged; a body
    /// that is not a valid envelope yields [`ApiError::Parse`](crate::error::ApiError::Parse).
    pub async fn fetch_data<T: DeserializeOwned>(&self, params: &RequestParams) -> Result<Page<T>, Error> {
        let client = self.inner.registry.resolve()?;

        debug!(
            "Fetching {} (first={}, rows={}, {} filters)",
            self.inner.endpoint,
            params.first,
            params.rows,
            params.filters.len()
        );

        let config = RequestConfig::new().with_request_params(params);
        let response = client.get(&self.inner.endpoint, config).await?;
        let page = response.json::<Page<T>>()?;

        Ok(page)
    }

    /// Requests the full dataset as a binary download.
    ///
    /// Same endpoint and params as [`fetch_data`](Self::fetch_data), with a
    /// `blob` response type and `Accept: application/octet-stream`. The
    /// response is returned as-is so the caller can read its headers
    /// (e.g. [`HttpResponse::filename`]).
    pub async fn export_data(&self, params: &RequestParams) -> Result<HttpResponse, Error> {
        let client = self.inner.registry.resolve()?;

        debug!("Exporting {}", self.inner.endpoint);

        let config = RequestConfig::new()
            .with_request_params(params)
            .with_response_type(ResponseType::Blob)
            .with_header("Accept", "application/octet-stream");

        client.get(&self.inner.endpoint, config).await
    }

    /// Runs one fetch-and-render cycle for the table `key` in `store`.
    ///
    /// Reads the table's current query state, sets `loading`, fetches, then
    /// stores the rows and total and clears `loading`. On failure `loading`
    /// is cleared and the error returned; rows are left as they were.
    ///
    /// Returns `Ok(false)` without issuing a request if `key` was never
    /// initialized. Overlapping loads for the same key both complete; the
    /// last to finish wins.
    pub async fn load<R>(&self, store: &DatatableStore<R>, key: &str) -> Result<bool, Error>
    where
        R: DeserializeOwned + Clone + Send + Sync,
    {
        let Some(state) = store.get(key) else {
            debug!("Skipping load for uninitialized table {:?}", key);
            return Ok(false);
        };

        let params = state.request_params();
        store.patch(key, TablePatch::new().with_loading(true));

        match self.fetch_data::<R>(&params).await {
            Ok(page) => {
                store.patch(key, TablePatch::loaded(page.data, page.total));
                Ok(true)
            }
            Err(e) => {
                warn!("Loading table {:?} from {} failed: {}", key, self.inner.endpoint, e);
                store.patch(key, TablePatch::new().with_loading(false));
                Err(e)
            }
        }
    }
}

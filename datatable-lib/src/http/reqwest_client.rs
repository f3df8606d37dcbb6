//! reqwest-backed HttpClient

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use log::warn;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::Client;
use url::Url;

use super::HttpClient;
use super::HttpResponse;
use super::RequestConfig;
use super::ResponseType;
use crate::error::ApiError;
use crate::error::Error;

/// An [`HttpClient`] built on `reqwest`.
///
/// Cheap to clone (uses `Arc` internally). Relative endpoint paths are
/// resolved against the configured base URL.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use datatable_lib::http::ReqwestHttpClient;
///
/// let client = ReqwestHttpClient::builder()
///     .base_url("https://api.example.com/v1")
///     .bearer_token("secret")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct ReqwestHttpClient {
    inner: Arc<ReqwestHttpClientInner>,
}

struct ReqwestHttpClientInner {
    base_url: Option<Url>,
    http_client: Client,
    default_headers: HeaderMap,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// Creates a new builder.
    pub fn builder() -> ReqwestHttpClientBuilder {
        ReqwestHttpClientBuilder::new()
    }

    /// Returns the base URL, if one was configured.
    pub fn base_url(&self) -> Option<&Url> {
        self.inner.base_url.as_ref()
    }

    fn resolve_url(&self, url: &str) -> Result<Url, ApiError> {
        let resolved = match &self.inner.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, config: RequestConfig) -> Result<HttpResponse, Error> {
        let url = self.resolve_url(url)?;

        let mut headers = self.inner.default_headers.clone();
        if config.response_type == ResponseType::Json {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        insert_headers(&mut headers, &config.headers);

        debug!(
            "GET {} ({} params, response type {})",
            url,
            config.params.len(),
            config.response_type.as_str()
        );

        let mut request = self
            .inner
            .http_client
            .get(url)
            .query(&config.params)
            .headers(headers);

        if let Some(token) = &self.inner.bearer_token {
            request = request.bearer_auth(token);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Reading error body for HTTP {} failed: {}", status.as_u16(), e);
                    String::new()
                }
            };
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(ApiError::http(status.as_u16(), message).into());
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let data = response.bytes().await.map_err(ApiError::from)?.to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            headers,
            data,
        })
    }
}

impl std::fmt::Debug for ReqwestHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpClient")
            .field("base_url", &self.inner.base_url.as_ref().map(Url::as_str))
            .field("timeout", &self.inner.timeout)
            .field("bearer_token", &self.inner.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Inserts headers, replacing existing values. Invalid names or values are skipped.
fn insert_headers(map: &mut HeaderMap, headers: &[(String, String)]) {
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!("Skipping invalid request header {:?}", name),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for constructing a [`ReqwestHttpClient`].
///
/// Nothing is required. Without a base URL every endpoint must be absolute.
#[derive(Default)]
pub struct ReqwestHttpClientBuilder {
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ReqwestHttpClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL that relative endpoint paths are resolved against.
    ///
    /// A trailing `/` is added if missing, so `https://host/api` and
    /// `https://host/api/` behave the same.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Adds a header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Sets a bearer token sent with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client, so it has no effect
    /// together with [`http_client`](Self::http_client).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom reqwest client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the [`ReqwestHttpClient`].
    pub fn build(self) -> Result<ReqwestHttpClient, ApiError> {
        let base_url = self
            .base_url
            .map(|raw| {
                let normalized = if raw.ends_with('/') {
                    raw
                } else {
                    format!("{}/", raw)
                };
                Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", normalized, e)))
            })
            .transpose()?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        let mut default_headers = HeaderMap::new();
        insert_headers(&mut default_headers, &self.default_headers);

        Ok(ReqwestHttpClient {
            inner: Arc::new(ReqwestHttpClientInner {
                base_url,
                http_client,
                default_headers,
                bearer_token: self.bearer_token,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_base() {
        let client = ReqwestHttpClient::builder()
            .base_url("https://api.example.com/v1")
            .build()
            .unwrap();
        assert_eq!(
            client.resolve_url("users").unwrap().as_str(),
            "https://api.example.com/v1/users"
        );
        assert_eq!(
            client.resolve_url("https://other.example.com/x").unwrap().as_str(),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn test_relative_path_without_base_is_invalid() {
        let client = ReqwestHttpClient::builder().build().unwrap();
        assert!(matches!(client.resolve_url("users"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ReqwestHttpClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_headers_are_skipped() {
        let mut map = HeaderMap::new();
        insert_headers(
            &mut map,
            &[
                ("X-Tenant".to_string(), "north".to_string()),
                ("bad header".to_string(), "x".to_string()),
            ],
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("x-tenant").unwrap(), "north");
    }
}

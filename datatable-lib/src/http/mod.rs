//! HTTP client indirection
//!
//! The library never talks to the network directly. The host application
//! provides an [`HttpClient`] (with its own auth headers, interceptors,
//! retries) and registers it in an [`HttpClientRegistry`]. A reqwest-backed
//! implementation, [`ReqwestHttpClient`], is included.

mod registry;
mod reqwest_client;

pub use registry::HttpClientRegistry;
pub use reqwest_client::ReqwestHttpClient;
pub use reqwest_client::ReqwestHttpClientBuilder;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::error::Error;
use crate::query::RequestParams;

/// Hint telling the client how the caller wants the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// JSON body, decoded by the caller.
    #[default]
    Json,
    /// Opaque binary payload (file download).
    Blob,
    /// Raw bytes.
    ArrayBuffer,
}

impl ResponseType {
    /// Returns the conventional name: `json`, `blob` or `arraybuffer`.
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::Json => "json",
            ResponseType::Blob => "blob",
            ResponseType::ArrayBuffer => "arraybuffer",
        }
    }

    /// Returns `true` for the binary response types.
    pub fn is_binary(self) -> bool {
        !matches!(self, ResponseType::Json)
    }
}

/// Per-request options passed to [`HttpClient::get`].
///
/// `params` holds the query string in bracket notation, ready to send.
/// Clients that need a different encoding can re-serialize from `request`,
/// the structured params the pairs were built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Query-string pairs, already serialized.
    pub params: Vec<(String, String)>,
    /// The structured params behind `params`, when the request came from a
    /// [`Datatable`](crate::Datatable).
    pub request: Option<RequestParams>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// How the body should be returned.
    pub response_type: ResponseType,
}

impl RequestConfig {
    /// Creates an empty config (no params, no headers, JSON response).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the query-string pairs.
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Sets `params` from `request` and keeps `request` alongside.
    pub fn with_request_params(mut self, request: &RequestParams) -> Self {
        self.params = request.to_query_pairs();
        self.request = Some(request.clone());
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the response type hint.
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Returns the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Returns the first query parameter with the given name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A response as returned by an [`HttpClient`].
///
/// The body is kept as raw bytes. List endpoints decode it with
/// [`HttpResponse::json`]; exports hand it to the caller untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub data: Vec<u8>,
}

impl HttpResponse {
    /// Creates a `200 OK` response with the given body.
    pub fn ok(data: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            data: data.into(),
        }
    }

    /// Creates a `200 OK` response with a JSON body.
    pub fn from_json<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::ok(serde_json::to_vec(value)?).with_header("content-type", "application/json"))
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Returns the `Content-Type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the response and returns the body bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.data).map_err(|e| match std::str::from_utf8(&self.data) {
            Ok(body) => ApiError::parse_with_body(e.to_string(), body),
            Err(_) => ApiError::parse(e.to_string()),
        })
    }

    /// Returns the download file name from `Content-Disposition`.
    ///
    /// `filename*=UTF-8''...` wins over a plain `filename=`.
    pub fn filename(&self) -> Option<String> {
        let disposition = self.header("content-disposition")?;
        let mut plain = None;

        for (name, value) in disposition_params(disposition) {
            match name.to_ascii_lowercase().as_str() {
                "filename*" => {
                    // charset'language'percent-encoded
                    let encoded = value.splitn(3, '\'').nth(2).unwrap_or(value.as_str());
                    if let Ok(decoded) = urlencoding::decode(encoded) {
                        return Some(decoded.into_owned());
                    }
                }
                "filename" if !value.is_empty() => plain = Some(value),
                _ => {}
            }
        }

        plain
    }
}

/// Splits `Content-Disposition` parameters into `(name, value)` pairs.
///
/// Separators inside quoted strings are kept and `\"` / `\\` escapes are
/// resolved. Parts without `=` (the disposition type) are skipped.
fn disposition_params(header: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut chars = header.chars().peekable();

    while chars.peek().is_some() {
        let mut name = String::new();
        let mut has_value = false;
        for c in chars.by_ref() {
            match c {
                '=' => {
                    has_value = true;
                    break;
                }
                ';' => break,
                _ => name.push(c),
            }
        }

        if !has_value {
            continue;
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'"').is_some() {
            while let Some(c) = chars.next() {
                match c {
                    '\\' => value.extend(chars.next()),
                    '"' => break,
                    _ => value.push(c),
                }
            }
            // skip anything up to the next separator
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
            }
        } else {
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
                value.push(c);
            }
            value = value.trim().to_string();
        }

        params.push((name.trim().to_string(), value));
    }

    params
}

/// The networking capability a host application must provide.
///
/// Only `GET` is needed. Implementations own transport concerns (auth,
/// retries, timeouts); errors they return are passed back to callers
/// unchanged.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use datatable_lib::error::Error;
/// use datatable_lib::http::{HttpClient, HttpResponse, RequestConfig};
///
/// struct Fixture;
///
/// #[async_trait]
/// impl HttpClient for Fixture {
///     async fn get(&self, _url: &str, _config: RequestConfig) -> Result<HttpResponse, Error> {
///         Ok(HttpResponse::ok(br#"{"data":[],"total":0}"#.to_vec()))
///     }
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issues `GET url` with the given params, headers and response type.
    async fn get(&self, url: &str, config: RequestConfig) -> Result<HttpResponse, Error>;
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

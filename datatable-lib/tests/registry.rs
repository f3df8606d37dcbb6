//! Tests for HTTP client registration.

use std::sync::Arc;

use async_trait::async_trait;
use datatable_lib::error::ConfigError;
use datatable_lib::error::Error;
use datatable_lib::http::HttpClient;
use datatable_lib::http::HttpClientRegistry;
use datatable_lib::http::HttpResponse;
use datatable_lib::http::RequestConfig;
use datatable_lib::query::RequestParams;
use datatable_lib::Datatable;

struct StaticClient(&'static str);

#[async_trait]
impl HttpClient for StaticClient {
    async fn get(&self, _url: &str, _config: RequestConfig) -> Result<HttpResponse, Error> {
        Ok(HttpResponse::ok(self.0.as_bytes().to_vec()))
    }
}

#[test]
fn test_resolve_before_register_fails() {
    let registry = HttpClientRegistry::new();
    assert!(!registry.has());
    assert_eq!(registry.resolve().err(), Some(ConfigError::NotConfigured));
}

#[test]
fn test_register_then_resolve_returns_same_instance() {
    let registry = HttpClientRegistry::new();
    let client: Arc<dyn HttpClient> = Arc::new(StaticClient("{}"));
    registry.register_shared(client.clone());

    assert!(registry.has());
    let resolved = registry.resolve().unwrap();
    assert!(Arc::ptr_eq(&resolved, &client));
}

#[test]
fn test_last_registration_wins() {
    let registry = HttpClientRegistry::new();
    let first: Arc<dyn HttpClient> = Arc::new(StaticClient("first"));
    let second: Arc<dyn HttpClient> = Arc::new(StaticClient("second"));
    registry.register_shared(first.clone());
    registry.register_shared(second.clone());

    let resolved = registry.resolve().unwrap();
    assert!(Arc::ptr_eq(&resolved, &second));
    assert!(!Arc::ptr_eq(&resolved, &first));
}

#[test]
fn test_reset_clears_slot() {
    let registry = HttpClientRegistry::new();
    registry.register(StaticClient("{}"));
    registry.reset();
    assert!(!registry.has());
    assert!(registry.resolve().is_err());
}

#[tokio::test]
async fn test_every_call_site_reports_not_configured() {
    let registry = Arc::new(HttpClientRegistry::new());
    let table = Datatable::new("users", registry.clone());
    let params = RequestParams::default();

    let fetch = table.fetch_data::<serde_json::Value>(&params).await.unwrap_err();
    assert!(fetch.is_not_configured());
    let export = table.export_data(&params).await.unwrap_err();
    assert!(export.is_not_configured());
    assert_eq!(
        export.to_string(),
        "datatable HTTP client used before one was registered"
    );

    registry.register(StaticClient(r#"{"data":[],"total":0}"#));
    registry.reset();
    let after_reset = table.fetch_data::<serde_json::Value>(&params).await.unwrap_err();
    assert!(after_reset.is_not_configured());
}

#[tokio::test]
async fn test_global_registry_is_shared() {
    let table = Datatable::with_global_registry("users");
    HttpClientRegistry::global().register(StaticClient(r#"{"data":[7],"total":1}"#));

    let page = table.fetch_data::<u32>(&RequestParams::default()).await.unwrap();
    assert_eq!(page.data, vec![7]);

    HttpClientRegistry::global().reset();
    assert!(!HttpClientRegistry::global().has());
}

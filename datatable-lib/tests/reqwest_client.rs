//! Round trips through `ReqwestHttpClient` against a one-shot local server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use datatable_lib::error::ApiError;
use datatable_lib::error::Error;
use datatable_lib::http::HttpClientRegistry;
use datatable_lib::http::ReqwestHttpClient;
use datatable_lib::query::Filter;
use datatable_lib::query::MatchMode;
use datatable_lib::query::RequestParams;
use datatable_lib::Datatable;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TestLogger;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Debug)]
struct Captured {
    uri: String,
    accept: Option<String>,
    authorization: Option<String>,
    tenant: Option<String>,
}

struct Reply {
    status: StatusCode,
    content_type: &'static str,
    disposition: Option<&'static str>,
    body: &'static [u8],
}

/// Serves a single connection and reports the first request it saw.
async fn serve_once(reply: Reply) -> (String, oneshot::Receiver<Captured>) {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let reply = Arc::new(reply);

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<Incoming>| {
            let tx = tx.clone();
            let reply = reply.clone();
            async move {
                let header = |name: &str| {
                    req.headers()
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .map(String::from)
                };
                let captured = Captured {
                    uri: req.uri().to_string(),
                    accept: header("accept"),
                    authorization: header("authorization"),
                    tenant: header("x-tenant"),
                };
                if let Some(sender) = tx.lock().unwrap().take() {
                    let _ = sender.send(captured);
                }

                let mut builder = Response::builder()
                    .status(reply.status)
                    .header("Content-Type", reply.content_type);
                if let Some(disposition) = reply.disposition {
                    builder = builder.header("Content-Disposition", disposition);
                }
                Ok::<_, Infallible>(builder.body(Full::new(Bytes::from_static(reply.body))).unwrap())
            }
        });

        let _ = http1::Builder::new().serve_connection(io, service).await;
    });

    (format!("http://{}/api", addr), rx)
}

fn table(base_url: &str) -> Datatable {
    let client = ReqwestHttpClient::builder()
        .base_url(base_url)
        .bearer_token("secret")
        .build()
        .unwrap();
    bind(client)
}

fn bind(client: ReqwestHttpClient) -> Datatable {
    let registry = Arc::new(HttpClientRegistry::new());
    registry.register(client);
    Datatable::new("users", registry)
}

const EMPTY_PAGE: Reply = Reply {
    status: StatusCode::OK,
    content_type: "application/json",
    disposition: None,
    body: br#"{"data":[],"total":0}"#,
};

#[tokio::test]
async fn test_fetch_page_over_http() {
    let (base, rx) = serve_once(Reply {
        status: StatusCode::OK,
        content_type: "application/json",
        disposition: None,
        body: br#"{"data":[{"id":1}],"total":1}"#,
    })
    .await;

    let params = RequestParams::new(0, 10).with_filter("name", Filter::single(MatchMode::Contains, "a b"));
    let page = table(&base).fetch_data::<Value>(&params).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0]["id"], 1);

    let captured = rx.await.unwrap();
    assert!(captured.uri.starts_with("/api/users?first=0&rows=10&"));
    assert!(captured.uri.contains("matchMode%5D=contains"));
    assert_eq!(captured.accept.as_deref(), Some("application/json"));
    assert_eq!(captured.authorization.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn test_export_over_http() {
    let (base, rx) = serve_once(Reply {
        status: StatusCode::OK,
        content_type: "application/octet-stream",
        disposition: Some("attachment; filename=\"users.xlsx\""),
        body: b"PK\x03\x04",
    })
    .await;

    let response = table(&base)
        .export_data(&RequestParams::default())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.bytes(), b"PK\x03\x04");
    assert_eq!(response.filename().as_deref(), Some("users.xlsx"));

    let captured = rx.await.unwrap();
    assert_eq!(captured.accept.as_deref(), Some("application/octet-stream"));
}

#[tokio::test]
async fn test_error_status_becomes_http_error() {
    let (base, _rx) = serve_once(Reply {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        content_type: "text/plain",
        disposition: None,
        body: b"unknown sort field",
    })
    .await;

    let err = table(&base)
        .fetch_data::<Value>(&RequestParams::default())
        .await
        .unwrap_err();

    match err {
        Error::Api(ApiError::Http { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "unknown sort field");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_default_header_sent_with_timeouts() {
    let (base, rx) = serve_once(EMPTY_PAGE).await;

    let client = ReqwestHttpClient::builder()
        .base_url(base)
        .default_header("X-Tenant", "north")
        .timeout(Duration::from_secs(5))
        .connect_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let page = bind(client)
        .fetch_data::<Value>(&RequestParams::default())
        .await
        .unwrap();
    assert!(page.is_empty());

    let captured = rx.await.unwrap();
    assert_eq!(captured.tenant.as_deref(), Some("north"));
    assert_eq!(captured.authorization, None);
}

#[tokio::test]
async fn test_custom_http_client_keeps_default_headers() {
    let (base, rx) = serve_once(EMPTY_PAGE).await;

    let client = ReqwestHttpClient::builder()
        .base_url(base)
        .http_client(reqwest::Client::new())
        .default_header("X-Tenant", "south")
        .bearer_token("secret")
        .build()
        .unwrap();
    bind(client)
        .fetch_data::<Value>(&RequestParams::default())
        .await
        .unwrap();

    let captured = rx.await.unwrap();
    assert_eq!(captured.tenant.as_deref(), Some("south"));
    assert_eq!(captured.authorization.as_deref(), Some("Bearer secret"));
}

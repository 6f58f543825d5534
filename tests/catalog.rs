//! Integration tests for the catalog listing

mod common;

use std::sync::Arc;

use capes_fetcher::app::{CatalogClient, ClientConfig, HttpHandler};
use capes_fetcher::errors::{AppError, CatalogError};

use common::{catalog_body, Reply, TestServer};

fn handler() -> Arc<HttpHandler> {
    let config = ClientConfig {
        use_system_proxy: false,
        rate_limit_rps: 1000,
        ..Default::default()
    };
    Arc::new(HttpHandler::from_config(&config).unwrap())
}

#[tokio::test]
async fn test_listing_is_flattened_and_memoized() {
    let server = TestServer::start(|target, _| {
        assert!(target.starts_with("/api/3/action/package_search?"));
        Reply::json(&catalog_body(
            "http://files.invalid",
            &[
                ("Catálogo de Teses e Dissertações - 2021", &[("teses-2021.csv", "CSV"), ("leia-me.pdf", "PDF")]),
                ("Programas de Pós-Graduação", &[("programas.csv", "CSV")]),
            ],
        ))
    })
    .await;

    let mut client = CatalogClient::new(handler(), &server.url("/api/3/action"), 128).unwrap();

    let first = client.list_resources("teses", 10).await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(first[0].dataset_name, "Catálogo de Teses e Dissertações - 2021");
    assert_eq!(first[1].format, "PDF");
    assert_eq!(first[2].url, "http://files.invalid/files/programas.csv");

    let second = client.list_resources("teses", 10).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(server.hits("/api/3/action/package_search"), 1);

    // A different row count is a different listing
    client.list_resources("teses", 20).await.unwrap();
    assert_eq!(server.hits("/api/3/action/package_search"), 2);

    let requests = server.requests();
    assert!(requests[0].contains("q=teses"));
    assert!(requests[0].contains("rows=10"));
    assert!(requests[1].contains("rows=20"));

    let stats = client.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.len, 2);
}

#[tokio::test]
async fn test_malformed_listing_is_format_error() {
    let server = TestServer::start(|_, _| Reply::json(r#"{"result": {"results": [{"resources": []}]}}"#)).await;
    let mut client = CatalogClient::new(handler(), &server.url("/api"), 128).unwrap();

    let err = client.list_resources("q", 1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Format(_)));
    assert_eq!(AppError::from(err).category(), "format");
}

#[tokio::test]
async fn test_error_status_is_network_error_and_not_retried() {
    let server = TestServer::start(|_, _| Reply::Status(503)).await;
    let mut client = CatalogClient::new(handler(), &server.url("/api"), 128).unwrap();

    let err = client.list_resources("q", 1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 503, .. }));
    assert_eq!(server.hits("/api/package_search"), 1);

    let app_error = AppError::from(err);
    assert_eq!(app_error.category(), "network");
    assert!(app_error.is_recoverable());
}

#[tokio::test]
async fn test_failed_listing_is_not_cached() {
    let server = TestServer::start(|_, previous| {
        if previous == 0 {
            Reply::Status(500)
        } else {
            Reply::json(r#"{"result": {"results": []}}"#)
        }
    })
    .await;
    let mut client = CatalogClient::new(handler(), &server.url("/api"), 128).unwrap();

    assert!(client.list_resources("q", 5).await.is_err());
    let table = client.list_resources("q", 5).await.unwrap();
    assert!(table.is_empty());
    assert_eq!(server.hits("/api/package_search"), 2);
}

#[tokio::test]
async fn test_unreachable_catalog_is_network_error() {
    // Bind then drop a listener so the port is very likely closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut client =
        CatalogClient::new(handler(), &format!("http://127.0.0.1:{}/api", port), 128).unwrap();

    let err = client.list_resources("q", 1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Http(_)));
    assert_eq!(AppError::from(err).category(), "network");
}

//! End-to-end tests: list, filter and download against a local catalog

mod common;

use std::sync::{Arc, OnceLock};

use capes_fetcher::app::{Pipeline, ProgressReporter, RetryPolicy, RunOptions};
use capes_fetcher::config::AppConfig;

use common::{catalog_body, Reply, TestServer};

/// Catalog with two CSV datasets, a PDF and a mixed-case format
async fn catalog_server() -> TestServer {
    let base: Arc<OnceLock<String>> = Arc::new(OnceLock::new());
    let handler_base = Arc::clone(&base);

    let server = TestServer::start(move |target, _| {
        if target.starts_with("/api/3/action/package_search") {
            let base = handler_base.get().map(String::as_str).unwrap_or("");
            Reply::json(&catalog_body(
                base,
                &[
                    (
                        "Catálogo de Teses e Dissertações - 2021",
                        &[("teses-2021.csv", "CSV"), ("dicionario.pdf", "PDF")],
                    ),
                    ("Programas da Pós-Graduação", &[("programas.csv", "CSV")]),
                    ("Discentes da Pós-Graduação", &[("discentes.csv", "csv")]),
                ],
            ))
        } else if let Some(file) = target.strip_prefix("/files/") {
            Reply::bytes(format!("contents of {}\n", file).as_bytes())
        } else {
            Reply::Status(404)
        }
    })
    .await;

    let _ = base.set(server.url(""));
    server
}

fn config_for(server: &TestServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.catalog.base_url = server.url("/api/3/action");
    config.client.use_system_proxy = false;
    config.client.rate_limit_rps = 1000;
    config.download.retry = RetryPolicy::immediate(5);
    config
}

fn options(config: &AppConfig, dest: &std::path::Path, name: &str, format: &str) -> RunOptions {
    RunOptions {
        dest_dir: dest.to_path_buf(),
        format: format.to_string(),
        name_pattern: name.to_string(),
        ..RunOptions::from_config(config)
    }
}

#[tokio::test]
async fn test_run_downloads_matching_resources_into_dataset_dirs() {
    let server = catalog_server().await;
    let config = config_for(&server);
    let temp_dir = tempfile::tempdir().unwrap();

    let mut pipeline = Pipeline::from_config(&config, ProgressReporter::hidden()).unwrap();
    let summary = pipeline
        .run(&options(&config, temp_dir.path(), "", "CSV"))
        .await
        .unwrap();

    assert_eq!(summary.listed, 4);
    assert_eq!(summary.selected, 2);

    let teses = temp_dir
        .path()
        .join("catalogo-de-teses-e-dissertacoes-2021")
        .join("teses-2021.csv");
    let programas = temp_dir
        .path()
        .join("programas-da-pos-graduacao")
        .join("programas.csv");
    assert_eq!(summary.paths, vec![teses.clone(), programas.clone()]);
    assert_eq!(
        std::fs::read_to_string(&teses).unwrap(),
        "contents of teses-2021.csv\n"
    );
    assert!(programas.exists());

    // Format matching is exact, so neither the PDF nor the lowercase csv is fetched
    assert_eq!(server.hits("/files/dicionario.pdf"), 0);
    assert_eq!(server.hits("/files/discentes.csv"), 0);
}

#[tokio::test]
async fn test_run_filters_by_dataset_name() {
    let server = catalog_server().await;
    let config = config_for(&server);
    let temp_dir = tempfile::tempdir().unwrap();

    let mut pipeline = Pipeline::from_config(&config, ProgressReporter::hidden()).unwrap();
    let summary = pipeline
        .run(&options(&config, temp_dir.path(), "Teses", "CSV"))
        .await
        .unwrap();

    assert_eq!(summary.selected, 1);
    assert_eq!(summary.paths.len(), 1);
    assert_eq!(server.hits("/files/teses-2021.csv"), 1);
    assert_eq!(server.hits("/files/programas.csv"), 0);
}

#[tokio::test]
async fn test_run_with_empty_selection_fetches_no_files() {
    let server = catalog_server().await;
    let config = config_for(&server);
    let temp_dir = tempfile::tempdir().unwrap();
    let dest = temp_dir.path().join("out");

    let mut pipeline = Pipeline::from_config(&config, ProgressReporter::hidden()).unwrap();
    let summary = pipeline
        .run(&options(&config, &dest, "Nonexistent", "CSV"))
        .await
        .unwrap();

    assert_eq!(summary.listed, 4);
    assert_eq!(summary.selected, 0);
    assert!(summary.paths.is_empty());
    assert!(dest.is_dir());
    assert!(server
        .requests()
        .iter()
        .all(|target| !target.starts_with("/files/")));
}

#[tokio::test]
async fn test_repeated_run_reuses_listing_and_downloads() {
    let server = catalog_server().await;
    let config = config_for(&server);
    let temp_dir = tempfile::tempdir().unwrap();
    let run_options = options(&config, temp_dir.path(), "", "CSV");

    let mut pipeline = Pipeline::from_config(&config, ProgressReporter::hidden()).unwrap();
    let first = pipeline.run(&run_options).await.unwrap();
    let second = pipeline.run(&run_options).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(server.hits("/api/3/action/package_search"), 1);
    assert_eq!(server.hits("/files/teses-2021.csv"), 1);
    assert_eq!(server.hits("/files/programas.csv"), 1);
}

#[tokio::test]
async fn test_failed_download_aborts_run() {
    let base: Arc<OnceLock<String>> = Arc::new(OnceLock::new());
    let handler_base = Arc::clone(&base);
    let server = TestServer::start(move |target, _| {
        if target.starts_with("/api/3/action/package_search") {
            let base = handler_base.get().map(String::as_str).unwrap_or("");
            Reply::json(&catalog_body(
                base,
                &[
                    ("Primeiro", &[("broken.csv", "CSV")]),
                    ("Segundo", &[("never.csv", "CSV")]),
                ],
            ))
        } else {
            Reply::Status(500)
        }
    })
    .await;
    let _ = base.set(server.url(""));

    let mut config = config_for(&server);
    config.download.retry = RetryPolicy::immediate(2);
    let temp_dir = tempfile::tempdir().unwrap();

    let mut pipeline = Pipeline::from_config(&config, ProgressReporter::hidden()).unwrap();
    let err = pipeline
        .run(&options(&config, temp_dir.path(), "", "CSV"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "download");
    assert_eq!(server.hits("/files/broken.csv"), 2);
    assert_eq!(server.hits("/files/never.csv"), 0);
}

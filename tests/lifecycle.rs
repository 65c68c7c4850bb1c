//! End-to-end tests over a real TCP socket: startup initialization and
//! graceful shutdown.

use std::fs;
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use watss_forms::common::config::ServerConfig;
use watss_forms::store::csv::parse_rows;
use watss_forms::FormServer;

/// Send one HTTP/1.1 request and read the full response text.
async fn http_request(addr: SocketAddr, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect to server");
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        method,
        path,
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_serve_initializes_store_and_shuts_down_gracefully() {
    let dir = tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.storage.data_file = dir.path().join("data.csv");
    config.storage.sync_writes = false;
    config.assets.static_dir = dir.path().to_path_buf();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = FormServer::new(config.clone());
    let task = tokio::spawn(async move {
        server
            .serve(listener, async move {
                let _ = stop_rx.await;
            })
            .await
    });

    let response = http_request(
        addr,
        "POST",
        "/submit",
        r#"{"name": "Ada", "email": "ada@x.com"}"#,
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains("\"success\":true"));

    let response = http_request(addr, "OPTIONS", "/submit", "").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response
        .to_ascii_lowercase()
        .contains("access-control-allow-methods: get, post, options"));

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("server stops after shutdown signal")
        .unwrap()
        .unwrap();

    // Listener is gone once serve returns
    assert!(TcpStream::connect(addr).await.is_err());

    let rows = parse_rows(&fs::read_to_string(&config.storage.data_file).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["Name", "Email", "Date", "Time"]);
    assert_eq!(rows[1][0], "Ada");
}

#[tokio::test]
async fn test_restart_keeps_single_header() {
    let dir = tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.storage.data_file = dir.path().join("data.csv");
    config.storage.sync_writes = false;
    config.assets.static_dir = dir.path().to_path_buf();

    for _ in 0..3 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = FormServer::new(config.clone());
        let task = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        let response = http_request(
            addr,
            "POST",
            "/submit",
            r#"{"name": "Grace", "email": "grace@x.com"}"#,
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);

        stop_tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }

    let content = fs::read_to_string(&config.storage.data_file).unwrap();
    assert_eq!(content.matches("Name,Email,Date,Time").count(), 1);
    assert!(content.starts_with("Name,Email,Date,Time\n"));
    assert_eq!(parse_rows(&content).unwrap().len(), 4);
}

#[tokio::test]
async fn test_store_in_missing_directory_fails_startup() {
    let dir = tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.storage.data_file = dir.path().join("nope").join("data.csv");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let result = FormServer::new(config)
        .serve(listener, std::future::pending::<()>())
        .await;

    assert!(result.is_err());
}

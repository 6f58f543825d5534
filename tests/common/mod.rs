//! In-process HTTP server for integration tests
//!
//! Serves scripted responses over plain HTTP/1.1 on a loopback port and
//! records the request target of every hit, so tests can assert how many
//! network calls a component made.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A scripted answer to one request
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with a body; `content_length` controls whether the header is sent
    Body {
        body: Vec<u8>,
        content_type: &'static str,
        content_length: bool,
    },
    /// A bare status with an empty body
    Status(u16),
    /// 200 with a content length, sending one body byte per `delay`
    Trickle { body: Vec<u8>, delay: Duration },
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Reply::Body {
            body: body.as_bytes().to_vec(),
            content_type: "application/json",
            content_length: true,
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Reply::Body {
            body: body.to_vec(),
            content_type: "application/octet-stream",
            content_length: true,
        }
    }

    pub fn trickle(body: &[u8], delay: Duration) -> Self {
        Reply::Trickle {
            body: body.to_vec(),
            delay,
        }
    }

    pub fn bytes_without_length(body: &[u8]) -> Self {
        Reply::Body {
            body: body.to_vec(),
            content_type: "application/octet-stream",
            content_length: false,
        }
    }
}

type Handler = dyn Fn(&str, usize) -> Reply + Send + Sync;

/// Loopback server answering every request through a handler
///
/// The handler receives the request target (path and query) and the
/// zero-based number of earlier requests to that same path.
pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, usize) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let handler = Arc::clone(&handler);
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let _ = serve(stream, handler, log).await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Absolute URL for `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request targets received so far, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose path (query excluded) equals `path`
    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|target| path_of(target) == path)
            .count()
    }
}

fn path_of(target: &str) -> &str {
    target.split('?').next().unwrap_or(target)
}

async fn serve(
    mut stream: TcpStream,
    handler: Arc<Handler>,
    log: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        head.extend_from_slice(&buf[..n]);
    }

    let text = String::from_utf8_lossy(&head);
    let target = text
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let previous = {
        let mut log = log.lock().unwrap();
        let previous = log
            .iter()
            .filter(|t| path_of(t) == path_of(&target))
            .count();
        log.push(target.clone());
        previous
    };

    let response = match handler(&target, previous) {
        Reply::Body {
            body,
            content_type,
            content_length,
        } => {
            let mut head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nConnection: close\r\n",
                content_type
            );
            if content_length {
                head.push_str(&format!("Content-Length: {}\r\n", body.len()));
            }
            head.push_str("\r\n");
            let mut response = head.into_bytes();
            response.extend_from_slice(&body);
            response
        }
        Reply::Trickle { body, delay } => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).await?;
            stream.flush().await?;
            for byte in body {
                tokio::time::sleep(delay).await;
                stream.write_all(&[byte]).await?;
                stream.flush().await?;
            }
            stream.shutdown().await?;
            return Ok(());
        }
        Reply::Status(status) => format!(
            "HTTP/1.1 {} Scripted\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status
        )
        .into_bytes(),
    };

    stream.write_all(&response).await?;
    stream.shutdown().await?;
    Ok(())
}

/// `package_search` body with one dataset per `(title, [(file, format)])`,
/// resource URLs pointing at `base` + `/files/<file>`
pub fn catalog_body(base: &str, datasets: &[(&str, &[(&str, &str)])]) -> String {
    let results: Vec<serde_json::Value> = datasets
        .iter()
        .map(|(title, resources)| {
            let resources: Vec<serde_json::Value> = resources
                .iter()
                .map(|(file, format)| {
                    serde_json::json!({
                        "url": format!("{}/files/{}", base, file),
                        "format": format,
                    })
                })
                .collect();
            serde_json::json!({ "title": title, "resources": resources })
        })
        .collect();

    serde_json::json!({
        "success": true,
        "result": { "count": results.len(), "results": results }
    })
    .to_string()
}

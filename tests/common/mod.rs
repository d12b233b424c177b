//! Shared utilities for integration testing.

use std::path::Path;
use std::time::Duration;

use proxy_agent::config::ProxyConfiguration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock proxy admin endpoint answering every request with `status`
/// and `body`. Returns the port it listens on.
#[allow(dead_code)]
pub async fn start_admin_server(status: u16, body: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            503 => "503 Service Unavailable",
                            _ => "500 Internal Server Error",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    port
}

/// Start an admin endpoint that accepts connections but never answers.
#[allow(dead_code)]
pub async fn start_silent_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    port
}

/// Proxy configuration launching `binary`, with generated files under `dir`.
#[allow(dead_code)]
pub fn proxy_config(binary: &str, dir: &Path) -> ProxyConfiguration {
    ProxyConfiguration {
        binary_path: binary.into(),
        config_dir: dir.to_path_buf(),
        drain_duration_ms: 1_000,
        parent_shutdown_duration_ms: 2_000,
        node_ips: vec!["127.0.0.1".to_string()],
        ..ProxyConfiguration::default()
    }
}

/// Upper bound for anything a test waits on.
#[allow(dead_code)]
pub const TEST_DEADLINE: Duration = Duration::from_secs(10);

//! Tests for the operational log written per connection

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use staticd::http::connection::{Connection, Outcome};
use staticd::http::files::DocumentRoot;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::Level;

/// Shared in-memory log sink.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn take_lines(&self) -> Vec<String> {
        let mut bytes = self.0.lock().unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        bytes.clear();
        text.lines().map(str::to_string).collect()
    }
}

fn install(buffer: &LogBuffer) -> tracing::subscriber::DefaultGuard {
    let sink = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_max_level(Level::TRACE)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .finish();

    tracing::subscriber::set_default(subscriber)
}

async fn exchange(root: &Path, request: &[u8]) -> Outcome {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
    let conn = Connection::new(server, peer, DocumentRoot::new(root.to_str().unwrap()));

    let client_side = async move {
        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();
        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();
    };

    let (outcome, ()) = tokio::join!(conn.run(), client_side);
    outcome.unwrap()
}

fn at_level<'a>(lines: &'a [String], level: &str) -> Vec<&'a String> {
    lines
        .iter()
        .filter(|line| line.trim_start().starts_with(level))
        .collect()
}

#[tokio::test]
async fn test_log_per_connection_outcome() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "logged").unwrap();

    let buffer = LogBuffer::default();
    let _guard = install(&buffer);

    // Closed before any byte: nothing above DEBUG.
    assert_eq!(exchange(dir.path(), b"").await, Outcome::NoRequest);
    let lines = buffer.take_lines();
    assert!(at_level(&lines, "WARN").is_empty(), "{:?}", lines);
    assert!(at_level(&lines, "ERROR").is_empty(), "{:?}", lines);
    assert!(at_level(&lines, "INFO").is_empty(), "{:?}", lines);

    // Malformed line: exactly one WARN and no request line.
    assert_eq!(exchange(dir.path(), b"GET\r\n").await, Outcome::Malformed);
    let lines = buffer.take_lines();
    let warns = at_level(&lines, "WARN");
    assert_eq!(warns.len(), 1, "{:?}", lines);
    assert!(warns[0].contains("Dropping malformed request"));
    assert!(at_level(&lines, "ERROR").is_empty(), "{:?}", lines);
    assert!(at_level(&lines, "INFO").is_empty(), "{:?}", lines);

    // Served GET: one INFO request event carrying every field.
    assert_eq!(
        exchange(dir.path(), b"GET /a.txt HTTP/1.1\r\n").await,
        Outcome::FileServed { bytes: 6 }
    );
    let lines = buffer.take_lines();
    let infos = at_level(&lines, "INFO");
    assert_eq!(infos.len(), 1, "{:?}", lines);
    let request = infos[0];
    assert!(request.contains("request"));
    assert!(request.contains("time="));
    assert!(request.contains("method=GET"));
    assert!(request.contains("path=/a.txt"));
    assert!(request.contains("protocol=HTTP/1.1"));
    assert!(request.contains("remote_addr=127.0.0.1"));
    assert!(request.contains("remote_port=50000"));
    assert!(at_level(&lines, "WARN").is_empty(), "{:?}", lines);
    assert!(at_level(&lines, "ERROR").is_empty(), "{:?}", lines);
}

#[tokio::test]
async fn test_request_time_has_fractional_seconds() {
    let dir = tempfile::tempdir().unwrap();

    let buffer = LogBuffer::default();
    let _guard = install(&buffer);

    exchange(dir.path(), b"POST /x HTTP/1.1\r\n").await;

    let lines = buffer.take_lines();
    let infos = at_level(&lines, "INFO");
    assert_eq!(infos.len(), 1, "{:?}", lines);

    let time = infos[0]
        .split_whitespace()
        .find_map(|field| field.strip_prefix("time="))
        .unwrap();
    let (secs, frac) = time.split_once('.').unwrap();
    assert!(secs.parse::<u64>().unwrap() > 0);
    assert_eq!(frac.len(), 6);
    assert!(infos[0].contains("method=POST"));
}

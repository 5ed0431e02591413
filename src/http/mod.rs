//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 to serve static files: one request line per
//! connection, GET only, no request headers, no keep-alive.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine and request-line reader
//! - **`parser`**: Splits a request line into method, path and version
//! - **`request`**: HTTP request representation
//! - **`response`**: Status codes and the two response body shapes
//! - **`writer`**: Serializes and writes responses to the client
//! - **`files`**: Resolves request paths to files under the document root
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitRequestLine │ ← Read until the first line ends
//!        └──────┬───────────┘
//!               │ EOF before any byte ──────────→ Closed(NoRequest)
//!               │ fewer than three fields ──────→ Closed(Malformed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Log, check method, resolve file
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← 200 with file body, or empty 404 / 405
//!        └──────┬───────────┘
//!               ▼
//!        Closed(FileServed | FileNotFound | MethodRejected)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use staticd::http::connection::Connection;
//! use staticd::http::files::DocumentRoot;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let root = DocumentRoot::new("/srv/www");
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let outcome = Connection::new(socket, peer, root.clone()).run().await?;
//!         println!("{peer}: {outcome:?}");
//!     }
//! }
//! ```

pub mod connection;
pub mod files;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use bytes::{Buf, BytesMut};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::http::files::{DocumentRoot, Lookup};
use crate::http::mime::content_type_for_path;
use crate::http::parser::{MAX_REQUEST_LINE, ParseError, find_line_end, parse_request_line};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// How a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Peer closed before sending anything.
    NoRequest,
    /// Request line could not be split into three fields. Nothing was sent.
    Malformed,
    /// 405 sent.
    MethodRejected,
    /// 404 sent.
    FileNotFound,
    /// 200 sent with `bytes` body bytes.
    FileServed { bytes: u64 },
}

enum ConnectionState {
    AwaitRequestLine,
    Processing(Request),
    Writing(Response, Outcome),
    Closed(Outcome),
}

/// One accepted client, handled from request line to close.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    root: DocumentRoot,
    /// Seconds since the epoch at accept time
    accepted_at: f64,
    buffer: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, root: DocumentRoot) -> Self {
        let accepted_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        Self {
            stream,
            peer,
            root,
            accepted_at,
            buffer: BytesMut::with_capacity(1024),
        }
    }

    /// Drives the connection to a terminal state and closes it.
    ///
    /// Errors are I/O failures on this connection only. If one happens while
    /// a body is being streamed, the client is left with a truncated response.
    pub async fn run(mut self) -> anyhow::Result<Outcome> {
        let mut state = ConnectionState::AwaitRequestLine;

        loop {
            state = match state {
                ConnectionState::AwaitRequestLine => match self.read_request().await {
                    Ok(Some(req)) => ConnectionState::Processing(req),
                    Ok(None) => {
                        debug!(peer = %self.peer, "Connection closed before request line");
                        ConnectionState::Closed(Outcome::NoRequest)
                    }
                    Err(e) => match e.downcast_ref::<ParseError>() {
                        Some(parse_err) => {
                            warn!(peer = %self.peer, error = %parse_err, "Dropping malformed request");
                            ConnectionState::Closed(Outcome::Malformed)
                        }
                        None => return Err(e),
                    },
                },

                ConnectionState::Processing(req) => {
                    self.log_request(&req);
                    let (response, outcome) = handle_request(&self.root, &req).await;
                    ConnectionState::Writing(response, outcome)
                }

                ConnectionState::Writing(response, outcome) => {
                    let mut writer = ResponseWriter::new(&mut self.stream);
                    let sent = match writer.send(response).await {
                        Ok(sent) => sent,
                        Err(e) => {
                            let written = writer.body_bytes_written();
                            return Err(e.context(format!(
                                "response truncated after {} body bytes",
                                written
                            )));
                        }
                    };

                    let outcome = match outcome {
                        Outcome::FileServed { .. } => Outcome::FileServed { bytes: sent },
                        other => other,
                    };
                    ConnectionState::Closed(outcome)
                }

                ConnectionState::Closed(outcome) => {
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(peer = %self.peer, error = %e, "Shutdown failed");
                    }
                    return Ok(outcome);
                }
            };
        }
    }

    /// Reads one request line.
    ///
    /// `Ok(None)` means the peer went away without sending a byte (a FIN or
    /// a reset on an idle connection). End of stream in the middle of a line
    /// parses what arrived.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            if let Some((line_len, consumed)) = find_line_end(&self.buffer) {
                if line_len > MAX_REQUEST_LINE {
                    return Err(ParseError::LineTooLong.into());
                }

                let line = String::from_utf8_lossy(&self.buffer[..line_len]).into_owned();
                self.buffer.advance(consumed);
                return Ok(Some(parse_request_line(&line)?));
            }

            if self.buffer.len() > MAX_REQUEST_LINE {
                return Err(ParseError::LineTooLong.into());
            }

            self.buffer.reserve(1024);
            let n = match self.stream.read_buf(&mut self.buffer).await {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::ConnectionReset && self.buffer.is_empty() => 0,
                Err(e) => return Err(e).context("failed to read request line"),
            };

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }

                let line = String::from_utf8_lossy(&self.buffer).into_owned();
                self.buffer.clear();
                return Ok(Some(parse_request_line(&line)?));
            }
        }
    }

    fn log_request(&self, req: &Request) {
        info!(
            time = %format!("{:.6}", self.accepted_at),
            method = %req.method,
            path = %req.path,
            protocol = %req.version,
            remote_addr = %self.peer.ip(),
            remote_port = self.peer.port(),
            "request"
        );
    }
}

/// Chooses the response for a parsed request. Only touches the filesystem.
pub async fn handle_request(root: &DocumentRoot, req: &Request) -> (Response, Outcome) {
    if !req.method.is_supported() {
        return (Response::method_not_allowed(), Outcome::MethodRejected);
    }

    let path = req.normalized_path();

    match root.resolve(&path).await {
        Lookup::File(file_path) => match open_file(&file_path).await {
            Ok((file, len)) => {
                let response = Response::stream(file, len, content_type_for_path(&path));
                (response, Outcome::FileServed { bytes: len })
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to open file");
                (Response::not_found(), Outcome::FileNotFound)
            }
        },
        Lookup::NotFound => (Response::not_found(), Outcome::FileNotFound),
        Lookup::OutsideRoot(resolved) => {
            warn!(
                path = %path,
                resolved = %resolved.display(),
                root = root.as_str(),
                "Request escapes document root"
            );
            (Response::not_found(), Outcome::FileNotFound)
        }
    }
}

/// Opens a file and measures it through the same handle that will be read.
async fn open_file(path: &Path) -> anyhow::Result<(File, u64)> {
    let file = File::open(path)
        .await
        .with_context(|| format!("open {}", path.display()))?;
    let len = file.metadata().await.context("stat opened file")?.len();

    Ok((file, len))
}

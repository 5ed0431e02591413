use std::fmt;

use bytes::Bytes;
use tokio::io::AsyncRead;

/// HTTP status codes the server can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 File Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the reason phrase written on the status line.
    ///
    /// 404 is sent as "File Not Found", not the RFC's "Not Found". Existing
    /// clients of this server match on it.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "File Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Byte source for a streamed body.
pub type BodyReader = Box<dyn AsyncRead + Unpin + Send>;

/// The two shapes a response body can take.
pub enum Body {
    /// Copied from `reader`. `len` is measured before anything is written and
    /// becomes the Content-length header.
    Stream { reader: BodyReader, len: u64 },

    /// An in-memory payload. When empty, no Content-type or Content-length
    /// header is sent at all, only the status line and the blank line.
    Literal(Bytes),
}

impl Body {
    /// Length that will be declared in Content-length.
    pub fn len(&self) -> u64 {
        match self {
            Body::Stream { len, .. } => *len,
            Body::Literal(payload) => payload.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether Content-type and Content-length headers are written.
    pub fn has_headers(&self) -> bool {
        match self {
            Body::Stream { .. } => true,
            Body::Literal(payload) => !payload.is_empty(),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Stream { len, .. } => f.debug_struct("Stream").field("len", len).finish(),
            Body::Literal(payload) => f.debug_tuple("Literal").field(payload).finish(),
        }
    }
}

/// A complete response, consumed when written.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Body,
}

impl Response {
    /// A 200 response streaming `len` bytes from `reader`.
    pub fn stream(
        reader: impl AsyncRead + Unpin + Send + 'static,
        len: u64,
        content_type: &'static str,
    ) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type,
            body: Body::Stream {
                reader: Box::new(reader),
                len,
            },
        }
    }

    pub fn literal(
        status: StatusCode,
        payload: impl Into<Bytes>,
        content_type: &'static str,
    ) -> Self {
        Self {
            status,
            content_type,
            body: Body::Literal(payload.into()),
        }
    }

    /// Status line and blank line, nothing else.
    pub fn empty(status: StatusCode) -> Self {
        Self::literal(status, Bytes::new(), "")
    }

    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::empty(StatusCode::MethodNotAllowed)
    }
}

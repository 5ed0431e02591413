use std::fmt;

/// HTTP request methods.
///
/// Only GET is served. Every other method, including ones this enum has no
/// name for, is answered with 405 Method Not Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other token, kept verbatim for logging
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(s) => s,
        }
    }

    /// Whether the server knows how to answer this method.
    pub fn is_supported(&self) -> bool {
        *self == Method::GET
    }
}

/// Case-sensitive, as on the wire: `get` is not `GET`.
///
/// ```
/// # use staticd::http::request::Method;
/// assert_eq!(Method::from("GET"), Method::GET);
/// assert_eq!(Method::from("get"), Method::Other("get".to_string()));
/// ```
impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request line. Headers and bodies are never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path exactly as sent (e.g., "/index.html")
    pub path: String,
    /// Protocol version token (typically "HTTP/1.1")
    pub version: String,
}

impl Request {
    /// The path with a leading `/` guaranteed.
    ///
    /// ```
    /// # use staticd::http::request::{Method, Request};
    /// let req = Request { method: Method::GET, path: "x".into(), version: "HTTP/1.1".into() };
    /// assert_eq!(req.normalized_path(), "/x");
    /// ```
    pub fn normalized_path(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }
}

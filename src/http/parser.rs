use thiserror::Error;

use crate::http::request::{Method, Request};

/// Longest request line accepted, terminator excluded.
pub const MAX_REQUEST_LINE: usize = 8 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequest(String),

    #[error("request line exceeds {MAX_REQUEST_LINE} bytes")]
    LineTooLong,
}

/// Splits a request line into method, path and protocol version.
///
/// The method and path are the first two whitespace-delimited tokens. The
/// version is whatever remains, trimmed. A line with fewer than three
/// fields is rejected rather than guessed at.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    let malformed = || ParseError::MalformedRequest(line.to_string());

    let (method, rest) = split_token(line).ok_or_else(malformed)?;
    let (path, rest) = split_token(rest).ok_or_else(malformed)?;

    let version = rest.trim();
    if version.is_empty() {
        return Err(malformed());
    }

    Ok(Request {
        method: Method::from(method),
        path: path.to_string(),
        version: version.to_string(),
    })
}

fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }

    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// Returns the length of the first line in `buf` and the length including
/// its `\n` terminator, or `None` if no full line is buffered yet.
///
/// A `\r` immediately before the `\n` is not part of the line.
pub fn find_line_end(buf: &[u8]) -> Option<(usize, usize)> {
    let newline = buf.iter().position(|&b| b == b'\n')?;
    let line_len = if newline > 0 && buf[newline - 1] == b'\r' {
        newline - 1
    } else {
        newline
    };

    Some((line_len, newline + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request_line("GET / HTTP/1.1").unwrap();

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/");
        assert_eq!(req.version, "HTTP/1.1");
    }

    #[test]
    fn split_token_skips_leading_whitespace() {
        assert_eq!(split_token("  GET /"), Some(("GET", " /")));
        assert_eq!(split_token("   "), None);
    }
}

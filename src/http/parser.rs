use crate::http::request::{Method, Request};
use std::collections::HashMap;
use std::fmt;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Largest request line, and largest header block, accepted.
pub const MAX_HEAD_BYTES: usize = 8 * 1024;
/// Largest `content-length` accepted.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The request line does not split into exactly three tokens
    MalformedRequestLine,
    UnsupportedMethod(String),
    UnsupportedUri(String),
    UnsupportedVersion(String),
    /// A header line without a ':' separator
    MalformedHeader,
    InvalidContentLength,
    /// Request line or header block over `MAX_HEAD_BYTES`
    HeadTooLarge,
    /// A `content-length` over `MAX_BODY_BYTES`
    BodyTooLarge(usize),
    /// The announced body is not valid JSON
    MalformedBody,
    /// More bytes are needed before the current stage can be decided
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedRequestLine => write!(f, "malformed request line"),
            ParseError::UnsupportedMethod(m) => write!(f, "unsupported method: {}", m),
            ParseError::UnsupportedUri(u) => write!(f, "unsupported URI: {}", u),
            ParseError::UnsupportedVersion(v) => write!(f, "unsupported version: {}", v),
            ParseError::MalformedHeader => write!(f, "malformed header line"),
            ParseError::InvalidContentLength => write!(f, "invalid content-length"),
            ParseError::HeadTooLarge => write!(f, "request head exceeds {} bytes", MAX_HEAD_BYTES),
            ParseError::BodyTooLarge(len) => {
                write!(f, "content-length {} exceeds {} bytes", len, MAX_BODY_BYTES)
            }
            ParseError::MalformedBody => write!(f, "request body is not valid JSON"),
            ParseError::Incomplete => write!(f, "incomplete request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The three tokens of a validated request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub uri: String,
    pub version: String,
}

/// Splits the next line off `buf`.
///
/// Returns the trimmed line and the number of bytes it occupied, newline
/// included. Once the peer has finished sending (`eof`), whatever is left
/// counts as the final line, empty if nothing is left.
fn next_line(buf: &[u8], eof: bool) -> Option<(&[u8], usize)> {
    match buf.iter().position(|&b| b == b'\n') {
        Some(pos) => Some((&buf[..pos], pos + 1)),
        None if eof => Some((buf, buf.len())),
        None => None,
    }
}

/// `Incomplete`, unless the bytes waiting for a line end already exceed the
/// head limit.
fn incomplete_head(pending: usize) -> ParseError {
    if pending > MAX_HEAD_BYTES {
        ParseError::HeadTooLarge
    } else {
        ParseError::Incomplete
    }
}

/// Parses and validates the request line at the start of `buf`.
pub fn parse_request_line(buf: &[u8], eof: bool) -> Result<(RequestLine, usize), ParseError> {
    let (raw, consumed) = next_line(buf, eof).ok_or_else(|| incomplete_head(buf.len()))?;
    if consumed > MAX_HEAD_BYTES {
        return Err(ParseError::HeadTooLarge);
    }
    let line = std::str::from_utf8(raw)
        .map_err(|_| ParseError::MalformedRequestLine)?
        .trim();

    let parts: Vec<&str> = line.split(' ').collect();
    let [method_str, uri, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine);
    };

    let method = Method::from_str(method_str)
        .ok_or_else(|| ParseError::UnsupportedMethod(method_str.to_string()))?;

    if !uri.starts_with('/') {
        return Err(ParseError::UnsupportedUri(uri.to_string()));
    }

    if *version != HTTP_VERSION {
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }

    let request_line = RequestLine {
        method,
        uri: uri.to_string(),
        version: version.to_string(),
    };
    Ok((request_line, consumed))
}

/// Parses header lines up to and including the terminating empty line.
///
/// Names are trimmed and lower-cased, values trimmed. A repeated name keeps
/// the value of its last occurrence.
pub fn parse_headers(buf: &[u8], eof: bool) -> Result<(HashMap<String, String>, usize), ParseError> {
    let mut headers = HashMap::new();
    let mut offset = 0;

    loop {
        let (raw, consumed) = next_line(&buf[offset..], eof)
            .ok_or_else(|| incomplete_head(buf.len()))?;
        offset += consumed;
        if offset > MAX_HEAD_BYTES {
            return Err(ParseError::HeadTooLarge);
        }

        let line = std::str::from_utf8(raw)
            .map_err(|_| ParseError::MalformedHeader)?
            .trim();

        if line.is_empty() {
            return Ok((headers, offset));
        }

        let (key, value) = line
            .split_once(':')
            .ok_or(ParseError::MalformedHeader)?;

        headers.insert(
            key.trim().to_lowercase(),
            value.trim().to_string(),
        );
    }
}

/// Number of body bytes announced by the `content-length` header, if any.
pub fn body_length(headers: &HashMap<String, String>) -> Result<Option<usize>, ParseError> {
    let Some(value) = headers.get("content-length") else {
        return Ok(None);
    };

    let len = value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength)?;
    if len > MAX_BODY_BYTES {
        return Err(ParseError::BodyTooLarge(len));
    }
    Ok(Some(len))
}

/// Takes exactly `len` body bytes from `buf` and decodes them as JSON.
///
/// A peer that stops sending before `len` bytes arrived leaves a truncated
/// body, which is reported as malformed.
pub fn parse_body(buf: &[u8], len: usize, eof: bool) -> Result<(Vec<u8>, serde_json::Value), ParseError> {
    if buf.len() < len {
        return Err(if eof { ParseError::MalformedBody } else { ParseError::Incomplete });
    }

    let body = buf[..len].to_vec();
    let json = serde_json::from_slice(&body).map_err(|_| ParseError::MalformedBody)?;
    Ok((body, json))
}

/// Parses a complete request held in `buf`.
///
/// Returns the request and the number of bytes consumed. The connection
/// drives the stages one by one instead; this is the one-shot form.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let (line, line_len) = parse_request_line(buf, false)?;
    let (headers, headers_len) = parse_headers(&buf[line_len..], false)?;
    let mut consumed = line_len + headers_len;

    let mut body = None;
    let mut json = None;
    if let Some(len) = body_length(&headers)? {
        let (bytes, value) = parse_body(&buf[consumed..], len, false)?;
        consumed += len;
        body = Some(bytes);
        json = Some(value);
    }

    let request = Request {
        method: line.method,
        uri: line.uri,
        version: line.version,
        headers,
        body,
        json,
    };
    Ok((request, consumed))
}

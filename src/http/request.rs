use crate::error::{ServerError, ServerResult};
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
}

impl Method {
    /// Parses a request-line method token. Unknown tokens are rejected so a
    /// garbage method can never match a registered route.
    pub fn from_token(s: &str) -> Option<Method> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "CONNECT" => Some(Method::CONNECT),
            "OPTIONS" => Some(Method::OPTIONS),
            "TRACE" => Some(Method::TRACE),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::PATCH => "PATCH",
        }
    }
}

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: &str) -> Request {
        Request {
            method,
            path: normalize_path(path),
            headers: HashMap::new(),
        }
    }

    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// Normalizes a request target: the query string is dropped and trailing
/// slashes are stripped, so `/foo/?x=1` matches a route registered as `/foo`.
pub(crate) fn normalize_path(target: &str) -> String {
    let path = target.split('?').next().unwrap_or("/");
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Reads one HTTP/1.1 request from the stream.
///
/// Returns `Ok(None)` when the peer closed the connection without sending
/// anything. A `Content-Length` body is read and discarded so the socket is
/// fully drained before the response goes out.
pub(crate) async fn parse<R>(reader: &mut R) -> ServerResult<Option<Request>>
where
    R: AsyncBufRead + Unpin,
{
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    if request_line.is_empty() {
        return Ok(None);
    }

    let mut parts = request_line.trim().split_whitespace();
    let method_token = parts
        .next()
        .ok_or_else(|| ServerError::ParseError("missing method".to_string()))?;
    let method = Method::from_token(method_token)
        .ok_or_else(|| ServerError::ParseError(format!("unknown method {}", method_token)))?;
    let target = parts
        .next()
        .ok_or_else(|| ServerError::ParseError("missing request target".to_string()))?;

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await?;

        if line.trim().is_empty() {
            break;
        }

        if let Some((key, value)) = line.trim().split_once(':') {
            headers.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    if let Some(content_length) = headers.get("content-length") {
        if let Ok(length) = content_length.parse::<u64>() {
            let mut drained = Vec::new();
            (&mut *reader).take(length).read_to_end(&mut drained).await?;
        }
    }

    Ok(Some(Request {
        method,
        path: normalize_path(target),
        headers,
    }))
}

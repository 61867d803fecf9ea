use crate::error::ServerError;
use std::collections::HashMap;
use std::time::SystemTime;

#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

impl Response {
    pub fn new(status: u16) -> Response {
        Response {
            status,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    // Chainable status setter
    pub fn status(&mut self, status: u16) -> &mut Self {
        self.status = status;
        self
    }

    // Generic body setter
    pub fn body<T: AsRef<str>>(&mut self, body: T) -> &mut Self {
        self.body = body.as_ref().to_string();
        self
    }

    // Generic header setter
    pub fn header<K: AsRef<str>, V: AsRef<str>>(&mut self, name: K, value: V) -> &mut Self {
        self.headers
            .insert(name.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// A 200 response with a plain-text body.
    pub fn text<T: AsRef<str>>(content: T) -> Response {
        let mut response = Response::new(200);
        response.header("Content-Type", "text/plain").body(content);
        response
    }

    /// Renders a `ServerError` as its plain-text HTTP response. A 405 carries
    /// the `Allow` header naming the methods registered for the path.
    pub fn error(err: ServerError) -> Response {
        let mut response = Response::new(err.status_code());
        if let ServerError::MethodNotAllowed { allowed } = &err {
            response.header("Allow", allowed.join(", "));
        }
        response
            .header("Content-Type", "text/plain")
            .body(err.to_string());
        response
    }

    pub(crate) fn reason_phrase(status: u16) -> &'static str {
        match status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    /// Serializes the response for the wire: status line, headers, `Date`,
    /// `Content-Length`, blank line, body.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut wire = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status,
            Self::reason_phrase(self.status)
        );
        for (name, value) in &self.headers {
            wire += &format!("{}: {}\r\n", name, value);
        }
        wire += &format!("Date: {}\r\n", httpdate::fmt_http_date(SystemTime::now()));
        wire += &format!("Content-Length: {}\r\n\r\n{}", self.body.len(), self.body);
        wire.into_bytes()
    }
}

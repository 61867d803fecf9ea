use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ServerError {
    /// The listening socket could not be bound. Fatal at startup.
    Bind { addr: String, source: io::Error },
    IoError(io::Error),
    ParseError(String),
    NotFound,
    MethodNotAllowed { allowed: Vec<&'static str> },
    PanicError(String),
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::ParseError(_) => 400,
            ServerError::NotFound => 404,
            ServerError::MethodNotAllowed { .. } => 405,
            ServerError::Bind { .. }
            | ServerError::IoError(_)
            | ServerError::PanicError(_) => 500,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind { addr, source } => {
                write!(f, "Failed to bind {}: {}", addr, source)
            }
            ServerError::IoError(err) => write!(f, "IO error: {}", err),
            ServerError::ParseError(msg) => write!(f, "Bad request: {}", msg),
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::MethodNotAllowed { .. } => write!(f, "Method Not Allowed"),
            ServerError::PanicError(msg) => write!(f, "Panic: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ServerError {
    fn from(err: io::Error) -> Self {
        ServerError::IoError(err)
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

//! The accept loop and per-connection handling.
//!
//! `Server` owns the router and drives connections on a tokio runtime. Each
//! connection carries one request: parse, dispatch, write the response, close.

use crate::error::{ServerError, ServerResult};
use crate::handler::{HttpResponse, IntoResponse};
use crate::http::{request, Request, Response};
use crate::router::Router;
use futures::FutureExt;
use std::io::Error;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

/// The server: a router plus the listener lifecycle.
///
/// # Example
///
/// ```no_run
/// use hellod::{Response, Server};
///
/// let mut server = Server::new();
/// server.get("/", |_req| async { Ok(Response::text("Hello, World!")) });
/// server.listen("0.0.0.0:5000").unwrap();
/// ```
#[derive(Clone)]
pub struct Server {
    pub max_connections: usize,
    router: Router,
}

impl Server {
    pub fn new() -> Self {
        Self {
            max_connections: 256,
            router: Router::new(),
        }
    }

    pub fn max_connections(&mut self, max_connections: usize) -> &mut Self {
        self.max_connections = max_connections;
        self
    }

    /// Registers a GET route handler
    ///
    /// # Arguments
    /// * `path` - The URL path to match
    /// * `handler` - The async handler function
    pub fn get<F, R>(&mut self, path: &str, handler: F)
    where
        F: Fn(Request) -> R + Send + Sync + 'static,
        R: IntoResponse + 'static,
    {
        self.router.get(path, handler);
    }

    /// Registers a POST route handler
    ///
    /// # Arguments
    /// * `path` - The URL path to match
    /// * `handler` - The async handler function
    pub fn post<F, R>(&mut self, path: &str, handler: F)
    where
        F: Fn(Request) -> R + Send + Sync + 'static,
        R: IntoResponse + 'static,
    {
        self.router.post(path, handler);
    }

    /// Binds the address and serves until the process exits.
    ///
    /// A failed bind is fatal: the error is returned and nothing is retried.
    ///
    /// # Arguments
    /// * `addr` - Address to listen on (e.g. "0.0.0.0:5000")
    pub fn listen(self, addr: &str) -> ServerResult<()> {
        let runtime = Runtime::new()?;
        runtime.block_on(async {
            let listener = TcpListener::bind(addr).await.map_err(|source| {
                ServerError::Bind {
                    addr: addr.to_string(),
                    source,
                }
            })?;
            tracing::info!("listening on http://{}", addr);
            self.run(listener).await
        })
    }

    /// The async accept loop. Split out from [`listen`](Self::listen) so
    /// callers that already hold a bound listener (tests, embedders) can
    /// drive the server on their own runtime.
    pub async fn run(self, listener: TcpListener) -> ServerResult<()> {
        let connection_counter = Arc::new(AtomicUsize::new(0));

        loop {
            let counter = Arc::clone(&connection_counter);
            if counter.load(Ordering::Relaxed) >= self.max_connections {
                // Saturated: yield until a connection drains.
                tracing::warn!("max connections reached");
                tokio::task::yield_now().await;
                continue;
            }

            match listener.accept().await {
                Ok((stream, peer)) => {
                    counter.fetch_add(1, Ordering::Relaxed);
                    let server = self.clone();

                    tokio::spawn(async move {
                        if let Err(err) = server.handle_connection(stream).await {
                            tracing::warn!("connection from {} failed: {}", peer, err);
                        }
                        counter.fetch_sub(1, Ordering::Relaxed);
                    });
                }
                Err(err) => tracing::warn!("accept failed: {}", err),
            }
        }
    }

    async fn handle_connection<S>(&self, mut stream: S) -> Result<(), Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut buf_reader = BufReader::new(&mut stream);

        let response = match request::parse(&mut buf_reader).await {
            Ok(Some(req)) => match self.handle(req).await {
                Ok(response) => response,
                Err(err) => Response::error(err),
            },
            // Peer connected and closed without sending a request.
            Ok(None) => return Ok(()),
            Err(err) => Response::error(err),
        };

        stream.write_all(&response.to_bytes()).await?;
        Ok(())
    }

    /// Dispatches one request through the router. Handler panics are caught
    /// and surface as 500 instead of tearing down the connection task.
    async fn handle(&self, req: Request) -> HttpResponse {
        let route = self.router.lookup(&req.path, req.method)?;
        let outcome = AssertUnwindSafe(route.handle(req)).catch_unwind().await;
        match outcome {
            Ok(response) => response,
            Err(err) => {
                let panic_msg = if let Some(msg) = err.downcast_ref::<&str>() {
                    msg.to_string()
                } else if let Some(msg) = err.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "Unknown panic".to_string()
                };
                Err(ServerError::PanicError(panic_msg))
            }
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

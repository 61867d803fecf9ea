use crate::error::ServerError;
use crate::handler::{Handler, HttpResponse, IntoResponse};
use crate::http::{Method, Request};
use crate::http::request::normalize_path;
use std::collections::HashMap;
use std::sync::Arc;

// Routes are registered once at startup and shared read-only across
// connection tasks, so the handler lives behind an Arc.
#[derive(Clone)]
pub(crate) struct Route {
    pub(crate) handler: Arc<dyn Handler>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").finish_non_exhaustive()
    }
}

impl Route {
    pub async fn handle(&self, req: Request) -> HttpResponse {
        self.handler.handle(req).await
    }
}

/// Maps `(path, method)` pairs to handlers. Paths are stored normalized, so
/// registration and lookup agree on trailing slashes.
#[derive(Clone)]
pub struct Router {
    routes: HashMap<String, HashMap<Method, Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn get<F, R>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(Request) -> R + Send + Sync + 'static,
        R: IntoResponse + 'static,
    {
        self.add(Method::GET, path, handler);
        self
    }

    pub fn post<F, R>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(Request) -> R + Send + Sync + 'static,
        R: IntoResponse + 'static,
    {
        self.add(Method::POST, path, handler);
        self
    }

    pub fn add<F, R>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(Request) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        let path = normalize_path(path);
        self.routes.entry(path).or_default().insert(
            method,
            Route {
                handler: Arc::new(handler),
            },
        );
    }

    /// Resolves a request to its route. An unknown path is `NotFound`; a
    /// known path without the requested method is `MethodNotAllowed` carrying
    /// the registered methods for the `Allow` header.
    pub(crate) fn lookup(&self, path: &str, method: Method) -> Result<&Route, ServerError> {
        let routes = self.routes.get(path).ok_or(ServerError::NotFound)?;
        routes.get(&method).ok_or_else(|| {
            let mut allowed: Vec<&'static str> = routes.keys().map(Method::as_str).collect();
            allowed.sort_unstable();
            ServerError::MethodNotAllowed { allowed }
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

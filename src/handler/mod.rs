use crate::error::ServerResult;
use crate::http::{Request, Response};
use futures::future::BoxFuture;
use std::future::Future;

pub type HttpResponse = ServerResult<Response>;

pub trait IntoResponse {
    fn into_response_future(self) -> BoxFuture<'static, HttpResponse>;
}

impl<F: Future<Output = HttpResponse> + Send + 'static> IntoResponse for F {
    fn into_response_future(self) -> BoxFuture<'static, HttpResponse> {
        Box::pin(self)
    }
}

/// An async route handler.
///
/// Blanket-implemented for closures, so a plain `|req| async { .. }`
/// registers directly. The route table holds handlers behind an `Arc` and is
/// never mutated after registration; handlers only need `&self`.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: Request) -> BoxFuture<'static, HttpResponse>;
}

impl<F, R> Handler for F
where
    F: Fn(Request) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn handle(&self, req: Request) -> BoxFuture<'static, HttpResponse> {
        (self)(req).into_response_future()
    }
}

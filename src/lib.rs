//! # hellod
//!
//! A tiny async HTTP server with exactly one job: answer `GET /` with
//! `Hello, World!`.
//!
//! The crate is split the usual way for a small server: request/response
//! types in [`http`], a `(path, method)` route table in [`router`], async
//! handler plumbing in [`handler`], and the accept loop in [`server`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use hellod::{Response, Server};
//!
//! fn main() {
//!     let mut server = Server::new();
//!
//!     server.get("/", |_req| async {
//!         Ok(Response::text("Hello, World!"))
//!     });
//!
//!     server.listen("0.0.0.0:5000").unwrap();
//! }
//! ```

pub mod error;
pub mod handler;
pub mod http;
pub mod router;
pub mod server;

pub use error::{ServerError, ServerResult};
pub use http::{Method, Request, Response};
pub use router::Router;
pub use server::Server;

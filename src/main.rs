//! The hellod binary: serves `Hello, World!` on 0.0.0.0:5000, like the
//! classic one-route demo app it replaces.

use hellod::{Response, Server};

const BIND_ADDR: &str = "0.0.0.0:5000";

fn main() {
    tracing_subscriber::fmt().init();

    let mut server = Server::new();
    server.get("/", |_req| async { Ok(Response::text("Hello, World!")) });

    if let Err(err) = server.listen(BIND_ADDR) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

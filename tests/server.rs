//! End-to-end tests: the server on an ephemeral port, raw HTTP over TCP.

use hellod::{Response, Server, ServerError};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn hello_server() -> Server {
    let mut server = Server::new();
    server.get("/", |_req| async { Ok(Response::text("Hello, World!")) });
    server
}

async fn start(server: Server) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.run(listener));
    addr
}

/// Sends one raw request and reads the whole response (the server closes the
/// connection after answering).
async fn send(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or("")
}

fn body(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or("")
}

#[tokio::test]
async fn get_root_returns_hello_world() {
    let addr = start(hello_server()).await;
    let response = send(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(status_line(&response), "HTTP/1.1 200 OK");
    assert_eq!(body(&response), "Hello, World!");
    assert!(response.contains("Content-Type: text/plain\r\n"));
    assert!(response.contains("Content-Length: 13\r\n"));
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let addr = start(hello_server()).await;
    let response = send(addr, "GET /missing HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(status_line(&response), "HTTP/1.1 404 Not Found");
}

#[tokio::test]
async fn post_to_root_returns_405_with_allow() {
    let addr = start(hello_server()).await;
    let response = send(
        addr,
        "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 3\r\n\r\nabc",
    )
    .await;
    assert_eq!(status_line(&response), "HTTP/1.1 405 Method Not Allowed");
    assert!(response.contains("Allow: GET\r\n"));
}

#[tokio::test]
async fn allow_header_lists_all_registered_methods() {
    let mut server = hello_server();
    server.post("/", |_req| async { Ok(Response::text("posted")) });
    let addr = start(server).await;
    let response = send(addr, "DELETE / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(status_line(&response), "HTTP/1.1 405 Method Not Allowed");
    assert!(response.contains("Allow: GET, POST\r\n"));
}

#[tokio::test]
async fn query_string_does_not_change_the_route() {
    let addr = start(hello_server()).await;
    let response = send(addr, "GET /?name=world HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(status_line(&response), "HTTP/1.1 200 OK");
    assert_eq!(body(&response), "Hello, World!");
}

#[tokio::test]
async fn repeated_requests_are_idempotent() {
    let addr = start(hello_server()).await;
    let first = send(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    for _ in 0..3 {
        let next = send(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
        assert_eq!(status_line(&next), status_line(&first));
        assert_eq!(body(&next), body(&first));
    }
}

#[test]
fn binding_a_taken_address_is_fatal() {
    // Hold the port with a plain std listener, then try to start on it.
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = taken.local_addr().unwrap();
    match hello_server().listen(&addr.to_string()) {
        Err(ServerError::Bind { addr: reported, .. }) => {
            assert_eq!(reported, addr.to_string());
        }
        other => panic!("expected a bind error, got {:?}", other.err()),
    }
}

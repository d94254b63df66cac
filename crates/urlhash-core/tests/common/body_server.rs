//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies per request path, one request per connection
//! (`Connection: close`). Unknown paths get a 404 with an empty body.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What the server sends for one path.
#[derive(Debug, Clone)]
pub enum Route {
    /// 200 OK with this body.
    Body(Vec<u8>),
    /// Response with an explicit status line, e.g. "500 Internal Server Error".
    Status(&'static str, Vec<u8>),
    /// Headers promise `claimed` bytes but only `body` is sent before the
    /// connection closes.
    Truncated { body: Vec<u8>, claimed: usize },
    /// 302 to another location.
    Redirect(String),
}

/// Routes for the `/hash1` and `/hash2` fixtures.
pub fn hash_routes() -> Vec<(&'static str, Route)> {
    vec![
        ("/hash1", Route::Body(b"hash1".to_vec())),
        ("/hash2", Route::Body(b"hash2".to_vec())),
    ]
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). The server runs until the
/// process exits.
pub fn start(routes: Vec<(&'static str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<&'static str, Route>> = Arc::new(routes.into_iter().collect());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A base URL on which nothing is listening.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<&'static str, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    match routes.get(path) {
        Some(Route::Body(body)) => respond(&mut stream, "200 OK", body, body.len(), ""),
        Some(Route::Status(status, body)) => respond(&mut stream, status, body, body.len(), ""),
        Some(Route::Truncated { body, claimed }) => {
            respond(&mut stream, "200 OK", body, *claimed, "")
        }
        Some(Route::Redirect(location)) => {
            let extra = format!("Location: {}\r\n", location);
            respond(&mut stream, "302 Found", b"", 0, &extra)
        }
        None => respond(&mut stream, "404 Not Found", b"", 0, ""),
    }
}

fn respond(stream: &mut TcpStream, status: &str, body: &[u8], content_length: usize, extra: &str) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status, content_length, extra
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

/// Returns (method, path) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    (method, path)
}

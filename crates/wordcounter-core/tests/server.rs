use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};

use serde_json::Value;
use wordcounter_core::{ErrorKind, Server, COUNT_ENDPOINT, PING_ENDPOINT};

fn start() -> SocketAddr {
    let server = Server::bind("127.0.0.1", 0).unwrap();
    let addr = server.local_addr().unwrap();
    std::thread::spawn(move || server.serve());
    addr
}

fn request(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).unwrap();
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(req.as_bytes()).unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).unwrap();

    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    assert!(head.contains("Connection: close"));
    let status = head.split_whitespace().nth(1).unwrap().parse().unwrap();
    (status, body.to_string())
}

#[test]
fn ping_and_count_over_tcp() {
    let addr = start();

    assert_eq!(request(addr, "GET", PING_ENDPOINT, ""), (200, "pong".to_string()));

    let (status, body) = request(addr, "POST", COUNT_ENDPOINT, r#"{"content":"Hello 世界\n第二行"}"#);
    assert_eq!(status, 200);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["data"]["Lines"], 2);
    assert_eq!(v["data"]["ChineseChars"], 5);
    assert_eq!(v["data"]["NonChineseChars"], 6);
    assert_eq!(v["data"]["TotalChars"], 11);
    assert_eq!(v["error"], "");
}

#[test]
fn bad_requests_over_tcp() {
    let addr = start();

    let (status, body) = request(addr, "POST", COUNT_ENDPOINT, "");
    assert_eq!(status, 422);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["msg"], "parse failed");

    let (status, body) = request(addr, "POST", COUNT_ENDPOINT, r#"{"content":""}"#);
    assert_eq!(status, 200);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["error"], "input string cannot be empty");

    assert_eq!(request(addr, "GET", "/missing", "").0, 404);
    assert_eq!(request(addr, "DELETE", PING_ENDPOINT, "").0, 405);
}

#[test]
fn bind_conflict_is_server_error() {
    let first = Server::bind("127.0.0.1", 0).unwrap();
    let port = first.local_addr().unwrap().port();
    let err = Server::bind("127.0.0.1", port).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
}

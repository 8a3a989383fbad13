//! HTTP 服务：对纯文本内容计数
//!
//! 基于 `std::net::TcpListener` 的最小 HTTP/1.1 实现，每个连接一个线程，响应后关闭连接。
//! - `GET  /v1/wordcounter/ping`  → `pong`
//! - `POST /v1/wordcounter/count` → `{"msg","data","error"}`
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::scanner::count_text;
use crate::stats::Stats;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const PING_ENDPOINT: &str = "/v1/wordcounter/ping";
pub const COUNT_ENDPOINT: &str = "/v1/wordcounter/count";

/// 请求体上限（字节）
const MAX_BODY: usize = 16 * 1024 * 1024;
/// 单次读取的超时时间
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// 计数请求体；缺少 content 字段按空串处理
#[derive(Debug, Deserialize)]
struct CountBody {
    #[serde(default)]
    content: String,
}

/// 处理结果（与传输层解耦，便于测试）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    fn json(status: u16, value: serde_json::Value) -> Self {
        Self { status, content_type: "application/json; charset=utf-8", body: value.to_string() }
    }

    fn text(status: u16, body: &str) -> Self {
        Self { status, content_type: "text/plain; charset=utf-8", body: body.to_string() }
    }
}

/// 路由分发
pub fn handle(method: &str, target: &str, body: &[u8]) -> Response {
    let path = target.split('?').next().unwrap_or(target);
    match (method, path) {
        ("GET", PING_ENDPOINT) => Response::text(200, "pong"),
        ("POST", COUNT_ENDPOINT) => handle_count(body),
        (_, PING_ENDPOINT) | (_, COUNT_ENDPOINT) => {
            Response::json(405, json!({ "msg": "method not allowed" }))
        }
        _ => Response::json(404, json!({ "msg": "not found" })),
    }
}

/// 计数接口：空体或非法 JSON 返回 422；统计错误写入响应的 error 字段
pub fn handle_count(body: &[u8]) -> Response {
    if body.is_empty() {
        return parse_failed("request body is empty");
    }
    let req: CountBody = match serde_json::from_slice(body) {
        Ok(b) => b,
        Err(e) => return parse_failed(&e.to_string()),
    };
    let (stats, error) = match count_text(&req.content) {
        Ok(s) => (s, String::new()),
        Err(e) => (Stats::default(), e.to_string()),
    };
    Response::json(200, json!({ "msg": "ok", "data": stats, "error": error }))
}

fn parse_failed(error: &str) -> Response {
    Response::json(422, json!({ "msg": "parse failed", "error": error }))
}

/// 阻塞式 HTTP 服务
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub fn bind(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&addr).map_err(|e| {
            Error::server(format!("failed to bind {addr}"))
                .with_source(e)
                .with_context("addr", &addr)
        })?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| Error::server("failed to read local address").with_source(e))
    }

    /// 持续接受连接，直到监听出错
    pub fn serve(&self) -> Result<()> {
        info!(addr = ?self.listener.local_addr().ok(), "server listening");
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    std::thread::spawn(move || {
                        if let Err(e) = handle_connection(stream) {
                            warn!(error = %e, "connection failed");
                        }
                    });
                }
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
        Ok(())
    }
}

fn handle_connection(stream: TcpStream) -> std::io::Result<()> {
    let peer = stream.peer_addr().ok();
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let response = match read_request(&mut reader)? {
        Some((method, target, body)) => {
            let resp = handle(&method, &target, &body);
            info!(?peer, %method, %target, status = resp.status, "request");
            resp
        }
        None => Response::json(400, json!({ "msg": "bad request" })),
    };
    write_response(stream, &response)
}

/// 读取请求行、头部和按 Content-Length 给出的请求体；格式错误返回 None
fn read_request<R: BufRead>(
    reader: &mut R,
) -> std::io::Result<Option<(String, String, Vec<u8>)>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(m), Some(t)) => (m.to_string(), t.to_string()),
        _ => return Ok(None),
    };

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                match value.trim().parse::<usize>() {
                    Ok(n) if n <= MAX_BODY => content_length = n,
                    _ => return Ok(None),
                }
            }
        }
    }

    // 按实际到达的字节增长缓冲
    let mut body = Vec::new();
    reader.by_ref().take(content_length as u64).read_to_end(&mut body)?;
    if body.len() < content_length {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "request body shorter than Content-Length",
        ));
    }
    debug!(%method, %target, len = body.len(), "request read");
    Ok(Some((method, target, body)))
}

fn write_response(mut stream: TcpStream, resp: &Response) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        resp.status,
        reason(resp.status),
        resp.content_type,
        resp.body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(resp.body.as_bytes())?;
    stream.flush()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        _ => "Unknown",
    }
}

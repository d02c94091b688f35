//! Transport seam between GameClient and the network
//!
//! `HttpTransport` is the real implementation. Tests substitute a scripted
//! transport to count requests and replay canned responses.

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::response::ServerResponse;

/// Longest response body echoed back in an error
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Request never produced a readable response (refused, DNS, TLS, reset)
    #[error("{}", error_chain(.0))]
    Request(#[from] reqwest::Error),
    /// Non-2xx response whose body was not a game response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// 2xx response whose body was not a game response
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Render an error with all of its sources, outermost first
fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

/// Posts a JSON body to an endpoint path and decodes the game response
#[async_trait]
pub trait GameTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: Value) -> Result<ServerResponse, TransportError>;
}

/// reqwest-backed transport
///
/// No request timeout is configured: a call settles only when the server
/// answers or the connection fails.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: HttpClient,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http = HttpClient::builder().build()?;
        Ok(Self::with_client(base_url, http))
    }

    /// Create a transport around an existing reqwest client
    pub fn with_client(base_url: &str, http: HttpClient) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GameTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: Value) -> Result<ServerResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(&body).send().await?;

        // The service reports game errors as JSON with 4xx/5xx codes, so the
        // body decides the outcome whenever it parses.
        let status = response.status();
        let text = response.text().await?;
        debug!(%url, status = status.as_u16(), bytes = text.len(), "game response");

        match serde_json::from_str::<ServerResponse>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate(text.trim(), MAX_ERROR_BODY),
            }),
            Err(err) => Err(TransportError::Decode(err)),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn test_client() -> HttpClient {
        HttpClient::builder().no_proxy().build().unwrap()
    }

    /// Serve exactly one HTTP response, returning the raw request received
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    fn request_body(raw: &str) -> Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_posts_json_to_endpoint() {
        let (base, server) = serve_once("200 OK", r#"{"status":"success","debug_year":1995}"#).await;
        let transport = HttpTransport::with_client(&format!("{}/", base), test_client());

        let resp = transport
            .post_json("/api/game/start", json!({ "visitorId": "visitor-9" }))
            .await
            .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.debug_year, Some(1995));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/game/start HTTP/1.1\r\n"));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        assert_eq!(request_body(&raw), json!({ "visitorId": "visitor-9" }));
    }

    #[tokio::test]
    async fn test_error_body_with_error_status_is_parsed() {
        let (base, server) =
            serve_once("400 Bad Request", r#"{"status":"error","message":"No game"}"#).await;
        let transport = HttpTransport::with_client(&base, test_client());

        let resp = transport.post_json("/api/game/guess", json!({})).await.unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.message.as_deref(), Some("No game"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_error_status() {
        let (base, server) = serve_once("502 Bad Gateway", "upstream down").await;
        let transport = HttpTransport::with_client(&base, test_client());

        let err = transport.post_json("/api/game/start", json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 502, .. }));
        assert_eq!(err.to_string(), "HTTP 502: upstream down");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let (base, server) = serve_once("200 OK", "<html></html>").await;
        let transport = HttpTransport::with_client(&base, test_client());

        let err = transport.post_json("/api/game/start", json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
        assert!(err.to_string().starts_with("invalid JSON response"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_includes_cause() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::with_client(&format!("http://{}", addr), test_client());
        let err = transport.post_json("/api/game/start", json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
        assert!(err.to_string().to_lowercase().contains("refused"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}

//! Minimal HTTP/1.1
//!
//! Just enough of HTTP for the leaderboard API: one request per
//! connection, `Content-Length` bodies, `Connection: close` responses.

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Longest accepted request line or header block.
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

/// HTTP parsing errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Socket failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed before sending a full request.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Request line or headers could not be parsed.
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// Body larger than the configured limit.
    #[error("Body of {length} bytes exceeds limit of {limit}")]
    BodyTooLarge {
        /// Declared length
        length: usize,
        /// Configured limit
        limit: usize,
    },
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Method, upper case (`GET`, `POST`, ...)
    pub method: String,
    /// Path without query string
    pub path: String,
    /// Headers with lower-cased names, in arrival order
    pub headers: Vec<(String, String)>,
    /// Raw body
    pub body: Vec<u8>,
}

impl Request {
    /// Build a request without a socket (tests, tooling).
    pub fn new(method: &str, path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Does `Content-Type` name `application/json` (parameters ignored)?
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .and_then(|value| value.split(';').next())
            .map(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false)
    }
}

/// Read one request from `reader`.
///
/// Bodies require `Content-Length`; chunked transfer encoding is rejected.
pub async fn read_request<R>(reader: &mut R, max_body: usize) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head_bytes = 0usize;

    // Request line
    let request_line = read_head_line(reader, &mut head_bytes).await?;
    if request_line.is_empty() {
        return Err(HttpError::ConnectionClosed);
    }

    let mut parts = request_line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v), None) => (m, t, v),
        _ => return Err(HttpError::Malformed(format!("bad request line {:?}", request_line))),
    };
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::Malformed(format!("unsupported version {}", version)));
    }
    let path = target.split('?').next().unwrap_or(target).to_string();

    // Headers
    let mut headers = Vec::new();
    loop {
        let line = read_head_line(reader, &mut head_bytes).await?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("bad header {:?}", line)))?;
        headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
    }

    let mut request = Request {
        method: method.to_ascii_uppercase(),
        path,
        headers,
        body: Vec::new(),
    };

    if request.header("transfer-encoding").is_some() {
        return Err(HttpError::Malformed("transfer-encoding not supported".into()));
    }

    // Body
    if let Some(length) = request.header("content-length") {
        let length: usize = length
            .parse()
            .map_err(|_| HttpError::Malformed(format!("bad content-length {:?}", length)))?;
        if length > max_body {
            return Err(HttpError::BodyTooLarge { length, limit: max_body });
        }
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                HttpError::ConnectionClosed
            } else {
                HttpError::Io(e)
            }
        })?;
        request.body = body;
    }

    Ok(request)
}

/// Read one CRLF (or LF) terminated line, without the terminator.
///
/// Returns an empty string at end of input.
async fn read_head_line<R>(reader: &mut R, head_bytes: &mut usize) -> Result<String, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    let limit = (MAX_HEAD_BYTES - (*head_bytes).min(MAX_HEAD_BYTES)) as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut raw).await?;
    *head_bytes += n;

    if *head_bytes > MAX_HEAD_BYTES {
        return Err(HttpError::Malformed("request head too large".into()));
    }
    if n > 0 && !raw.ends_with(b"\n") {
        return Err(HttpError::ConnectionClosed);
    }

    while matches!(raw.last(), Some(b'\n') | Some(b'\r')) {
        raw.pop();
    }
    String::from_utf8(raw).map_err(|_| HttpError::Malformed("non-UTF-8 request head".into()))
}

/// An outgoing response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// `Content-Type` header value
    pub content_type: &'static str,
    /// Body bytes
    pub body: Vec<u8>,
}

impl Response {
    /// JSON response from any serializable body.
    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self {
                status,
                content_type: "application/json; charset=utf-8",
                body: bytes,
            },
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                Self::text(500, "internal error")
            }
        }
    }

    /// Plain-text response.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
        }
    }

    /// Serialize status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }

    /// Write to `writer` and flush.
    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.to_bytes()).await?;
        writer.flush().await
    }
}

/// Reason phrase for the status codes this server emits.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn parse(raw: &str, max_body: usize) -> Result<Request, HttpError> {
        let mut reader = BufReader::new(raw.as_bytes());
        read_request(&mut reader, max_body).await
    }

    #[tokio::test]
    async fn test_parse_get() {
        let req = parse("GET /api/leaderboard?x=1 HTTP/1.1\r\nHost: localhost\r\n\r\n", 1024)
            .await
            .unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/api/leaderboard");
        assert_eq!(req.header("HOST"), Some("localhost"));
        assert!(req.body.is_empty());
    }

    #[tokio::test]
    async fn test_parse_post_body() {
        let body = r#"{"score":30}"#;
        let raw = format!(
            "POST /api/score HTTP/1.1\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let req = parse(&raw, 1024).await.unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.body, body.as_bytes());
        assert!(req.is_json());
    }

    #[test]
    fn test_is_json() {
        let with_type = |value: &str| Request {
            headers: vec![("content-type".to_string(), value.to_string())],
            ..Request::new("POST", "/", Vec::new())
        };

        assert!(with_type("application/json").is_json());
        assert!(with_type("Application/JSON; charset=utf-8").is_json());
        assert!(!with_type("text/plain").is_json());
        assert!(!with_type("application/x-www-form-urlencoded").is_json());
        assert!(!Request::new("POST", "/", Vec::new()).is_json());
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let raw = "POST /api/score HTTP/1.1\r\nContent-Length: 2048\r\n\r\n";
        assert!(matches!(
            parse(raw, 1024).await,
            Err(HttpError::BodyTooLarge { length: 2048, limit: 1024 })
        ));
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let raw = "POST /api/score HTTP/1.1\r\nContent-Length: 20\r\n\r\n{}";
        assert!(matches!(parse(raw, 1024).await, Err(HttpError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_malformed() {
        assert!(matches!(parse("NONSENSE\r\n\r\n", 1024).await, Err(HttpError::Malformed(_))));
        assert!(matches!(
            parse("GET / HTTP/1.1\r\nno-colon-here\r\n\r\n", 1024).await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(
            parse("POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n", 1024).await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(
            parse("POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n", 1024).await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(parse("GET / SPDY/3\r\n\r\n", 1024).await, Err(HttpError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_oversized_head() {
        let raw = format!("GET / HTTP/1.1\r\nX-Big: {}\r\n\r\n", "a".repeat(MAX_HEAD_BYTES));
        assert!(matches!(parse(&raw, 1024).await, Err(HttpError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_empty_connection() {
        assert!(matches!(parse("", 1024).await, Err(HttpError::ConnectionClosed)));
    }

    #[test]
    fn test_response_bytes() {
        let resp = Response::text(200, "ok");
        let text = String::from_utf8(resp.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\nok"));
    }

    #[test]
    fn test_json_response() {
        let resp = Response::json(400, &serde_json::json!({"ok": false}));
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, br#"{"ok":false}"#);
        assert!(resp.content_type.starts_with("application/json"));
    }
}

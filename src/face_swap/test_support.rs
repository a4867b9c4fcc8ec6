//! 单次应答的本地 HTTP 服务，供客户端测试使用。

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// 服务端收到的请求。
pub(crate) struct CapturedRequest {
    pub(crate) head: String,
    pub(crate) body: Vec<u8>,
}

impl CapturedRequest {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    pub(crate) fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }
}

/// 启动服务，收满一个请求后按给定状态行与正文应答。
///
/// 返回 `http://127.0.0.1:<port>` 与线程句柄（join 后拿到请求）。
pub(crate) fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
    let addr = listener.local_addr().expect("read local addr failed");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept failed");
        let captured = read_request(&mut stream);

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status_line,
            content_type,
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .expect("write headers failed");
        stream.write_all(&body).expect("write body failed");
        stream.flush().expect("flush failed");

        captured
    });

    (format!("http://127.0.0.1:{}", addr.port()), handle)
}

fn read_request(stream: &mut impl Read) -> CapturedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).expect("read request failed");
        assert!(n > 0, "connection closed before headers completed");
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).to_string();
    let mut body = buffer[head_end + 4..].to_vec();
    let headers = CapturedRequest {
        head,
        body: Vec::new(),
    };

    if let Some(len) = headers.header("content-length").and_then(|v| v.parse::<usize>().ok()) {
        while body.len() < len {
            let n = stream.read(&mut chunk).expect("read body failed");
            assert!(n > 0, "connection closed before body completed");
            body.extend_from_slice(&chunk[..n]);
        }
    } else if headers
        .header("transfer-encoding")
        .is_some_and(|v| v.eq_ignore_ascii_case("chunked"))
    {
        while !body.ends_with(b"0\r\n\r\n") {
            let n = stream.read(&mut chunk).expect("read chunked body failed");
            assert!(n > 0, "connection closed before chunked body completed");
            body.extend_from_slice(&chunk[..n]);
        }
    }

    CapturedRequest {
        head: headers.head,
        body,
    }
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A document the probe sent to the store.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub method: String,
    pub path: String,
    pub body: serde_json::Value,
}

/// Stand-in Elasticsearch node: answers every request with one status and
/// keeps what was posted. Lives until the test runtime shuts down.
pub struct MockElasticsearch {
    addr: SocketAddr,
    documents: Arc<Mutex<Vec<IndexedDocument>>>,
}

impl MockElasticsearch {
    pub async fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let documents = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&documents);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(Self::serve(stream, status, Arc::clone(&sink)));
            }
        });

        Self { addr, documents }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn documents(&self) -> Vec<IndexedDocument> {
        self.documents.lock().unwrap().clone()
    }

    async fn serve(mut stream: TcpStream, status: u16, sink: Arc<Mutex<Vec<IndexedDocument>>>) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let (head_len, content_length) = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                break (pos + 4, length);
            }
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        };

        while buf.len() < head_len + content_length {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let request_line = String::from_utf8_lossy(&buf[..head_len]).to_string();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();
        let body = serde_json::from_slice(&buf[head_len..head_len + content_length])
            .unwrap_or(serde_json::Value::Null);

        sink.lock().unwrap().push(IndexedDocument { method, path, body });

        let reply = "{}";
        let response = format!(
            "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reply.len(),
            reply
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }
}

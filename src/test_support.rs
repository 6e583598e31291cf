// Loopback HTTP fixtures shared by the client and session tests.
use std::io::ErrorKind;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub async fn bind_local() -> Option<TcpListener> {
    match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => Some(listener),
        // Sandboxed CI may forbid binding; callers skip in that case.
        Err(e) if e.kind() == ErrorKind::PermissionDenied => None,
        Err(e) => panic!("failed to bind test listener: {e}"),
    }
}

/// Serves one canned response under `/api` and hands back the raw request it received.
pub async fn start_test_server(status_line: &str, body: &str) -> Option<(String, oneshot::Receiver<String>)> {
    let listener = bind_local().await?;
    let base_url = format!("http://{}/api", listener.local_addr().expect("local_addr"));
    let status_line = status_line.to_string();
    let body = body.to_string();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(_) => return,
        };

        let mut buf = [0u8; 8192];
        let read = socket.read(&mut buf).await.unwrap_or(0);
        let _ = tx.send(String::from_utf8_lossy(&buf[..read]).to_string());

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {len}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}",
            len = body.len(),
        );
        let _ = socket.write_all(response.as_bytes()).await;
    });

    Some((base_url, rx))
}

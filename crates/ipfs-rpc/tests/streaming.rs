//! Timeouts against a daemon that sends its `get` body slowly.

use ipfs_rpc::{ClientOptions, IpfsClient, RpcError};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const CHUNK: &[u8] = b"tarblock";

/// One-shot HTTP server answering with `chunks` chunked-body pieces, `gap` apart.
async fn slow_daemon(chunks: usize, gap: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = "HTTP/1.1 200 OK\r\nContent-Type: application/x-tar\r\nTransfer-Encoding: chunked\r\n\r\n";
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for _ in 0..chunks {
            tokio::time::sleep(gap).await;
            let piece = format!("{:x}\r\n{}\r\n", CHUNK.len(), String::from_utf8_lossy(CHUNK));
            if socket.write_all(piece.as_bytes()).await.is_err() {
                return;
            }
        }
        let _ = socket.write_all(b"0\r\n\r\n").await;
    });

    format!("http://{}", addr)
}

fn client(endpoint: &str, idle: Duration) -> IpfsClient {
    IpfsClient::with_options(
        endpoint,
        ClientOptions {
            idle_timeout: Some(idle),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn get_outlives_the_timeout_while_bytes_keep_arriving() {
    // 8 pieces 150ms apart: about 1.2s in total against a 500ms timeout.
    let endpoint = slow_daemon(8, Duration::from_millis(150)).await;
    let mut reader = client(&endpoint, Duration::from_millis(500))
        .get("QmSlow")
        .await
        .unwrap();

    let mut received = Vec::new();
    reader.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, CHUNK.repeat(8));
}

#[tokio::test]
async fn stalled_daemon_still_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    // Accepts the connection and never answers.
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let answer = tokio::time::timeout(
        Duration::from_secs(5),
        client(&endpoint, Duration::from_millis(200)).repo_stat(),
    )
    .await
    .expect("idle timeout should end the request");
    assert!(matches!(answer, Err(RpcError::Http(_))), "{answer:?}");
}

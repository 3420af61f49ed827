//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// JSON body the mock upstream serves for a successful tick lookup.
pub fn tick_body(instrument: &str) -> String {
    format!(
        r#"{{"Data":{{"{instrument}":{{
            "TYPE":"1101",
            "MARKET":"cadli",
            "INSTRUMENT":"{instrument}",
            "VALUE":612345.17,
            "VALUE_FLAG":"UP",
            "VALUE_LAST_UPDATE_TS":1735689600,
            "CURRENT_HOUR_VOLUME":1532.4,
            "CURRENT_HOUR_OPEN":610000.0,
            "CURRENT_HOUR_HIGH":613500.0,
            "CURRENT_HOUR_LOW":609800.5,
            "CURRENT_HOUR_CHANGE":2345.17,
            "CURRENT_HOUR_CHANGE_PERCENTAGE":0.38
        }}}},"Err":{{}}}}"#
    )
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// The closure decides status and body per request.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

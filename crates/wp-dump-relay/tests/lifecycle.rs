use futures::StreamExt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use wp_dump_relay::{DumpServer, RelayConfig, StartOutcome, StopOutcome};

fn ephemeral() -> RelayConfig {
    RelayConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        ..RelayConfig::default()
    }
}

async fn http(addr: SocketAddr, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        method,
        path,
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_start_post_stop() {
    let mut server = DumpServer::new(ephemeral());
    let mut dumps = server.subscribe();

    let addr = match server.start().await.unwrap() {
        StartOutcome::Started(addr) => addr,
        other => panic!("Expected Started, got {:?}", other),
    };
    assert_ne!(addr.port(), 0);
    assert_eq!(
        server.start().await.unwrap(),
        StartOutcome::AlreadyRunning(addr)
    );

    let status = server.status();
    assert!(status.running);
    assert_eq!(status.port, addr.port());

    let response = http(addr, "POST", "/dump", r#"{"content":"hello"}"#).await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    assert!(response.ends_with("OK"));

    let dump = tokio::time::timeout(Duration::from_secs(5), dumps.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dump.content, "hello");

    let status_body = http(addr, "GET", "/status", "").await;
    assert!(status_body.contains(&format!(r#""port":{}"#, addr.port())));

    assert_eq!(server.stop().await.unwrap(), StopOutcome::Stopped);
    assert_eq!(server.stop().await.unwrap(), StopOutcome::NotRunning);
    assert!(!server.status().running);
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_history_survives_restart() {
    let mut server = DumpServer::new(ephemeral());

    let StartOutcome::Started(addr) = server.start().await.unwrap() else {
        panic!("server did not start");
    };
    http(addr, "POST", "/dump", r#"{"dump":"kept"}"#).await;
    server.stop().await.unwrap();

    assert!(matches!(
        server.start().await.unwrap(),
        StartOutcome::Started(_)
    ));
    let history = server.hub().history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "kept");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_bind_conflict_is_an_error() {
    let mut first = DumpServer::new(ephemeral());
    let StartOutcome::Started(addr) = first.start().await.unwrap() else {
        panic!("server did not start");
    };

    let mut second = DumpServer::new(RelayConfig {
        port: addr.port(),
        ..ephemeral()
    });
    assert!(matches!(
        second.start().await,
        Err(wp_dump_relay::RelayError::Bind { .. })
    ));
    assert!(!second.status().running);

    first.stop().await.unwrap();
}

#[tokio::test]
async fn test_websocket_viewer_receives_new_dump() {
    let mut server = DumpServer::new(ephemeral());
    let StartOutcome::Started(addr) = server.start().await.unwrap() else {
        panic!("server did not start");
    };

    let (mut viewer, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .unwrap();

    let response = http(addr, "POST", "/dump", r#"{"content":"hello"}"#).await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);

    let message = timeout(Duration::from_secs(5), viewer.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let Message::Text(text) = message else {
        panic!("Expected a text frame, got {:?}", message);
    };

    let event: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(event["event"], "new-dump");
    assert_eq!(event["data"]["content"], "hello");
    assert!(event["data"]["source"].is_null());
    assert!(event["data"]["time"].as_str().unwrap().ends_with('Z'));

    // Stopping must not wait for the viewer to hang up
    let stopped = timeout(Duration::from_secs(5), server.stop()).await.unwrap();
    assert_eq!(stopped.unwrap(), StopOutcome::Stopped);

    let after_stop = timeout(Duration::from_secs(5), viewer.next()).await.unwrap();
    assert!(
        matches!(after_stop, None | Some(Ok(Message::Close(_))) | Some(Err(_))),
        "{:?}",
        after_stop
    );
}

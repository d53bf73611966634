//! The real-time channel over a live socket

use crate::test_utils::*;
use futures_util::SinkExt;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Poll until the registry reaches `expected` open connections
async fn wait_for_connections(app: &TestApp, expected: usize) {
    for _ in 0..100 {
        if app.state.connections.len() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "expected {expected} open connections, found {}",
        app.state.connections.len()
    );
}

async fn serve(app: &TestApp) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_connect_and_disconnect_are_tracked() {
    let app = setup_test_app();
    let addr = serve(&app).await;

    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    wait_for_connections(&app, 1).await;

    socket.send(Message::Text("hello".into())).await.unwrap();
    socket.close(None).await.unwrap();
    wait_for_connections(&app, 0).await;
}

#[tokio::test]
async fn test_dropped_socket_is_unregistered() {
    let app = setup_test_app();
    let addr = serve(&app).await;

    let (first, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let (second, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    wait_for_connections(&app, 2).await;

    drop(first);
    wait_for_connections(&app, 1).await;

    drop(second);
    wait_for_connections(&app, 0).await;
}

#[tokio::test]
async fn test_channel_needs_no_session() {
    let app = setup_test_app();
    let addr = serve(&app).await;

    let result = connect_async(format!("ws://{addr}/ws")).await;
    assert!(result.is_ok());
}

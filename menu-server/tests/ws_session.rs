//! WebSocket sessions over a real listener

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use common::{TestApp, error_code};
use futures::StreamExt;
use http::{Method, StatusCode};
use serde_json::Value;
use shared::message::NotificationEvent;
use shared::models::NotificationKind;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, path: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}{path}")).await.unwrap();
    ws
}

/// Handshake that the server must refuse; returns status and error envelope
async fn refused(addr: SocketAddr, path: &str) -> (StatusCode, Value) {
    match connect_async(format!("ws://{addr}{path}")).await {
        Err(WsError::Http(resp)) => {
            let body = resp
                .body()
                .as_deref()
                .and_then(|b| serde_json::from_slice(b).ok())
                .unwrap_or(Value::Null);
            (resp.status(), body)
        }
        Err(e) => panic!("unexpected handshake error: {e}"),
        Ok(_) => panic!("handshake for {path} should be refused"),
    }
}

/// Next JSON text frame, skipping pings
async fn next_frame(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .unwrap();
        match msg {
            Message::Text(_) => return serde_json::from_str(msg.to_text().unwrap()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_admin_ws_rejects_bad_token() {
    let app = TestApp::new().await;
    let addr = app.spawn_server().await;

    let (status, body) = refused(addr, "/ws/admin?token=not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 1004);
}

#[tokio::test]
async fn test_order_ws_unknown_order() {
    let app = TestApp::new().await;
    let addr = app.spawn_server().await;

    let (status, body) = refused(addr, "/ws/orders/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), 4001);
}

#[tokio::test]
async fn test_admin_ws_ready_then_notifications() {
    let app = TestApp::new().await;
    let (burger, _, tables) = app.seed().await;
    app.placed_order(tables[0], burger, 1).await;
    let addr = app.spawn_server().await;

    let mut ws = connect(addr, &format!("/ws/admin?token={}", app.token)).await;
    let ready = next_frame(&mut ws).await;
    assert_eq!(ready["type"], "ready");
    assert_eq!(ready["unread"], 1);

    let second = app.placed_order(tables[1], burger, 2).await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["type"], "notification");
    assert_eq!(frame["event"]["type"], "new_order");
    assert_eq!(frame["event"]["order_id"], second);
    assert_eq!(frame["event"]["table"], "T2");
    assert_eq!(frame["event"]["unread"], 2);
}

#[tokio::test]
async fn test_order_ws_sees_own_order_only() {
    let app = TestApp::new().await;
    let (burger, _, tables) = app.seed().await;
    let mine = app.placed_order(tables[0], burger, 1).await;
    let other = app.placed_order(tables[1], burger, 1).await;
    let addr = app.spawn_server().await;

    let mut ws = connect(addr, &format!("/ws/orders/{mine}")).await;
    let ready = next_frame(&mut ws).await;
    assert_eq!(ready["type"], "ready");
    // customers have no unread counter
    assert_eq!(ready["unread"], 0);

    let (status, _) = app
        .admin(Method::POST, &format!("/api/admin/orders/{other}/accept"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .admin(Method::POST, &format!("/api/admin/orders/{mine}/accept"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"]["type"], "accept");
    assert_eq!(frame["event"]["order_id"], mine);
}

#[tokio::test]
async fn test_lagging_session_resyncs_with_ready() {
    let app = TestApp::with_config(|c| c.broadcast_capacity = 1).await;
    let addr = app.spawn_server().await;

    let mut ws = connect(addr, &format!("/ws/admin?token={}", app.token)).await;
    assert_eq!(next_frame(&mut ws).await["type"], "ready");

    let group = app.state.notifier.admin_group().to_string();
    let event = |id: i64| NotificationEvent {
        kind: NotificationKind::NewComment,
        notification_id: id,
        order_id: None,
        table: None,
        body: format!("burst {id}"),
        url: String::new(),
        created_at: 0,
        unread: id,
    };

    // no await in between, so the session cannot drain the channel
    for id in 1..=5 {
        assert_eq!(app.state.channels.group_send(&group, event(id)), 1);
    }

    let resync = next_frame(&mut ws).await;
    assert_eq!(resync["type"], "ready");
    assert_eq!(resync["unread"], 0);

    // the fresh subscription keeps delivering
    app.state.channels.group_send(&group, event(6));
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["type"], "notification");
    assert_eq!(frame["event"]["notification_id"], 6);
}

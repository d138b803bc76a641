//! WebSocket 会话循环

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use shared::message::WsServerMessage;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::core::ServerState;
use crate::db::repository::notification;
use crate::notify::order_group;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Who is listening on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Staff console, receives every notification
    Admin,
    /// Customer view of one order
    Order(i64),
}

impl Audience {
    pub fn group(&self, state: &ServerState) -> String {
        match self {
            Audience::Admin => state.notifier.admin_group().to_string(),
            Audience::Order(id) => order_group(*id),
        }
    }

    /// Ready frame; customers have no unread counter
    async fn ready(&self, state: &ServerState) -> WsServerMessage {
        let unread = match self {
            Audience::Admin => current_unread(state).await,
            Audience::Order(_) => 0,
        };
        WsServerMessage::Ready { unread }
    }
}

async fn current_unread(state: &ServerState) -> i64 {
    let counted = match state.pool().acquire().await {
        Ok(mut conn) => notification::count_unopened(&mut conn).await.ok(),
        Err(_) => None,
    };
    counted.unwrap_or_else(|| {
        tracing::warn!("Failed to count unread notifications for ready frame");
        0
    })
}

pub(super) async fn run(socket: WebSocket, state: ServerState, audience: Audience) {
    let (mut sink, mut stream) = socket.split();
    let group = audience.group(&state);

    // 先订阅再发 ready，避免丢失中间事件
    let mut rx = state.channels.group_add(&group);
    tracing::info!(group = %group, "WS connected");

    let ready = audience.ready(&state).await;
    if send_message(&mut sink, &ready).await.is_err() {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let msg = WsServerMessage::Notification { event };
                        if send_message(&mut sink, &msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(group = %group, lagged = n, "WS subscriber lagged, resyncing");
                        rx = state.channels.group_add(&group);
                        let ready = audience.ready(&state).await;
                        if send_message(&mut sink, &ready).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    // 客户端只读，其余帧忽略
                    _ => {}
                }
            }
        }
    }

    tracing::info!(group = %group, "WS disconnected");
}

async fn send_message<S>(sink: &mut S, msg: &WsServerMessage) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = msg.to_json().map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

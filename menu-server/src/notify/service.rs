//! NotificationService - 订单状态转换 → 通知
//!
//! 每次转换在一个事务内完成：条件 UPDATE 判断标志是否由 false 变为 true，
//! 只有真正发生变化时才写入一条 Notification。提交后再广播，
//! 因此一次转换恰好对应一条记录和一次广播。

use shared::error::{AppError, AppResult, ErrorCode};
use shared::message::NotificationEvent;
use shared::models::{Comment, Notification, NotificationKind, Order};
use sqlx::{SqliteConnection, SqlitePool};

use super::ChannelLayer;
use crate::db::repository::{RepoError, begin_write, comment, notification, order};

/// Group carrying updates for one order
pub fn order_group(order_id: i64) -> String {
    format!("order_{order_id}")
}

/// Order flag transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Place,
    Cancel,
    Accept,
}

impl Transition {
    fn kind(self) -> NotificationKind {
        match self {
            Transition::Place => NotificationKind::NewOrder,
            Transition::Cancel => NotificationKind::Cancel,
            Transition::Accept => NotificationKind::Accept,
        }
    }

    async fn apply(self, conn: &mut SqliteConnection, order_id: i64) -> Result<bool, RepoError> {
        match self {
            Transition::Place => order::mark_ordered(conn, order_id).await,
            Transition::Cancel => order::mark_canceled(conn, order_id).await,
            Transition::Accept => order::mark_accepted(conn, order_id).await,
        }
    }

    /// Why the conditional update did not fire
    fn rejection(self, order: &Order) -> AppError {
        let code = match self {
            Transition::Place if order.canceled => ErrorCode::OrderAlreadyCanceled,
            Transition::Place if order.ordered => ErrorCode::OrderAlreadyPlaced,
            Transition::Place => ErrorCode::OrderEmpty,
            _ if !order.ordered => ErrorCode::OrderNotPlaced,
            _ if order.canceled => ErrorCode::OrderAlreadyCanceled,
            _ if order.order_accept => ErrorCode::OrderAlreadyAccepted,
            _ => ErrorCode::OrderLocked,
        };
        AppError::new(code).with_detail("order_id", order.id)
    }
}

/// Outcome of a successful transition
#[derive(Debug, Clone)]
pub struct Notified {
    pub notification: Notification,
    /// Subscribers the event reached across both groups
    pub delivered: usize,
}

#[derive(Clone)]
pub struct NotificationService {
    pool: SqlitePool,
    channels: ChannelLayer,
    admin_group: String,
    base_url: String,
}

impl NotificationService {
    pub fn new(
        pool: SqlitePool,
        channels: ChannelLayer,
        admin_group: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            channels,
            admin_group: admin_group.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn channels(&self) -> &ChannelLayer {
        &self.channels
    }

    pub fn admin_group(&self) -> &str {
        &self.admin_group
    }

    /// Admin console link for an order
    pub fn order_url(&self, order_id: i64) -> String {
        format!("{}/admin/orders/{}", self.base_url, order_id)
    }

    /// 下单: draft → pending，需要至少一个订单项
    pub async fn place_order(&self, order_id: i64) -> AppResult<Notified> {
        self.transition(order_id, Transition::Place).await
    }

    /// 取消: pending → canceled
    pub async fn cancel_order(&self, order_id: i64) -> AppResult<Notified> {
        self.transition(order_id, Transition::Cancel).await
    }

    /// 接单: pending → accepted
    pub async fn accept_order(&self, order_id: i64) -> AppResult<Notified> {
        self.transition(order_id, Transition::Accept).await
    }

    /// 添加评论，每条评论产生一条 `new_comment` 通知
    pub async fn add_comment(&self, order_id: i64, body: &str) -> AppResult<(Comment, Notified)> {
        if body.trim().is_empty() {
            return Err(AppError::new(ErrorCode::CommentEmpty));
        }

        let mut tx = begin_write(&self.pool).await?;
        let table = order::table_name(&mut *tx, order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;

        let comment = comment::insert(&mut *tx, order_id, body).await?;
        let text = format!("Table {table}: new comment on order #{order_id}");
        let (notification, unread) =
            self.record(&mut *tx, NotificationKind::NewComment, &text, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        let delivered = self.publish(&notification, Some(table), unread);
        Ok((comment, Notified { notification, delivered }))
    }

    async fn transition(&self, order_id: i64, transition: Transition) -> AppResult<Notified> {
        let mut tx = begin_write(&self.pool).await?;

        if !transition.apply(&mut *tx, order_id).await? {
            tx.rollback().await.map_err(RepoError::from)?;
            let current = order::find_by_id(&self.pool, order_id)
                .await?
                .ok_or_else(|| order_not_found(order_id))?;
            return Err(transition.rejection(&current));
        }

        let table = order::table_name(&mut *tx, order_id).await?.unwrap_or_default();
        let text = match transition {
            Transition::Place => format!("Table {table}: new order #{order_id}"),
            Transition::Cancel => format!("Table {table}: order #{order_id} canceled"),
            Transition::Accept => format!("Order #{order_id} accepted"),
        };
        let (notification, unread) =
            self.record(&mut *tx, transition.kind(), &text, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id,
            kind = %notification.kind,
            notification_id = notification.id,
            "Order transition recorded"
        );

        let delivered = self.publish(&notification, Some(table), unread);
        Ok(Notified { notification, delivered })
    }

    /// Insert the notification row and read the new unread count
    async fn record(
        &self,
        conn: &mut SqliteConnection,
        kind: NotificationKind,
        body: &str,
        order_id: i64,
    ) -> AppResult<(Notification, i64)> {
        let url = self.order_url(order_id);
        let notification = notification::insert(conn, kind, body, Some(order_id), &url).await?;
        let unread = notification::count_unopened(conn).await?;
        Ok((notification, unread))
    }

    /// Fan out to the admin group and the order's own group (after commit)
    fn publish(&self, notification: &Notification, table: Option<String>, unread: i64) -> usize {
        let event = NotificationEvent::from_notification(notification, table, unread);
        let mut delivered = self.channels.group_send(&self.admin_group, event.clone());
        if let Some(order_id) = notification.order_id {
            delivered += self.channels.group_send(&order_group(order_id), event);
        }
        tracing::debug!(notification_id = notification.id, delivered, "Notification broadcast");
        delivered
    }
}

fn order_not_found(order_id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
        .with_detail("order_id", order_id)
}

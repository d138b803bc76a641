//! Notification Repository

use super::RepoResult;
use shared::models::{Notification, NotificationKind};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, body, kind, opened, order_id, url, created_at";

/// Insert a notification as part of the caller's transaction
pub async fn insert(
    conn: &mut SqliteConnection,
    kind: NotificationKind,
    body: &str,
    order_id: Option<i64>,
    url: &str,
) -> RepoResult<Notification> {
    let row = sqlx::query_as::<_, Notification>(&format!(
        "INSERT INTO notification (body, kind, order_id, url, created_at) VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(body)
    .bind(kind)
    .bind(order_id)
    .bind(url)
    .bind(shared::util::now_millis())
    .fetch_one(&mut *conn)
    .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let row = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notification WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// One page of notifications, newest first, plus the total
pub async fn list(
    pool: &SqlitePool,
    unopened_only: bool,
    per_page: u32,
    offset: i64,
) -> RepoResult<(Vec<Notification>, u64)> {
    let (total,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM notification WHERE (?1 = 0 OR opened = 0)")
            .bind(unopened_only)
            .fetch_one(pool)
            .await?;

    let rows = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notification WHERE (?1 = 0 OR opened = 0) ORDER BY id DESC LIMIT ?2 OFFSET ?3"
    ))
    .bind(unopened_only)
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total.max(0) as u64))
}

pub async fn count_unopened(conn: &mut SqliteConnection) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notification WHERE opened = 0")
        .fetch_one(&mut *conn)
        .await?;
    Ok(n)
}

/// Returns false when no such notification exists
pub async fn mark_opened(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE notification SET opened = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

/// Mark every unopened notification as opened. Returns how many changed.
pub async fn mark_all_opened(pool: &SqlitePool) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE notification SET opened = 1 WHERE opened = 0")
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM notification WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

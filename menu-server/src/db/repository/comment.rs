//! Comment Repository

use super::{RepoError, RepoResult};
use shared::models::Comment;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn list_for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Comment>> {
    let rows = sqlx::query_as::<_, Comment>(
        "SELECT id, order_id, body, created_at FROM comment WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert a comment as part of the caller's transaction
pub async fn insert(conn: &mut SqliteConnection, order_id: i64, body: &str) -> RepoResult<Comment> {
    let body = body.trim();
    if body.is_empty() {
        return Err(RepoError::Validation("Comment body must not be empty".into()));
    }

    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comment (order_id, body, created_at) VALUES (?, ?, ?) RETURNING id, order_id, body, created_at",
    )
    .bind(order_id)
    .bind(body)
    .bind(shared::util::now_millis())
    .fetch_one(&mut *conn)
    .await?;
    Ok(comment)
}

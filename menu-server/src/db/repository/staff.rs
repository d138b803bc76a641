//! Staff Repository

use super::{RepoError, RepoResult};
use crate::auth::password;
use shared::models::Staff;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, username, hash_pass, is_active, created_at";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Staff>> {
    let row = sqlx::query_as::<_, Staff>(&format!(
        "SELECT {COLUMNS} FROM staff WHERE username = ? LIMIT 1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Create a staff account, hashing the password with argon2
pub async fn create(pool: &SqlitePool, username: &str, plain_password: &str) -> RepoResult<Staff> {
    let username = username.trim();
    if username.is_empty() || plain_password.is_empty() {
        return Err(RepoError::Validation("Username and password are required".into()));
    }
    let hash_pass = password::hash_password(plain_password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let row = sqlx::query_as::<_, Staff>(&format!(
        "INSERT INTO staff (username, hash_pass, created_at) VALUES (?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(username)
    .bind(hash_pass)
    .bind(shared::util::now_millis())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

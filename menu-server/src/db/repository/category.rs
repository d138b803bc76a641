//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM category WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let name = validate_name(&data.name)?;
    let now = shared::util::now_millis();
    let id = sqlx::query("INSERT INTO category (name, created_at) VALUES (?, ?)")
        .bind(name)
        .bind(now)
        .execute(pool)
        .await?
        .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    if let Some(name) = data.name.as_deref() {
        let name = validate_name(name)?;
        let rows = sqlx::query("UPDATE category SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();
        if rows == 0 {
            return Err(RepoError::NotFound(format!("Category {id} not found")));
        }
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category and, by cascade, its items
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

fn validate_name(name: &str) -> RepoResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("Category name must not be empty".into()));
    }
    Ok(name)
}

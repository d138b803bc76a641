//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    let name = validate_name(&data.name)?;
    let id = sqlx::query("INSERT INTO dining_table (name, created_at) VALUES (?, ?)")
        .bind(name)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?
        .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
    if let Some(name) = data.name.as_deref() {
        let name = validate_name(name)?;
        let rows = sqlx::query("UPDATE dining_table SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();
        if rows == 0 {
            return Err(RepoError::NotFound(format!("Table {id} not found")));
        }
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

/// Delete a table together with its orders
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

fn validate_name(name: &str) -> RepoResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("Table name must not be empty".into()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn test_crud() {
        let pool = test_pool().await;
        let t = create(&pool, DiningTableCreate { name: "A1".into() }).await.unwrap();
        assert!(matches!(
            create(&pool, DiningTableCreate { name: "A1".into() }).await.unwrap_err(),
            RepoError::Duplicate(_)
        ));

        let t = update(&pool, t.id, DiningTableUpdate { name: Some("A2".into()) }).await.unwrap();
        assert_eq!(t.name, "A2");
        assert_eq!(find_all(&pool).await.unwrap().len(), 1);
        assert!(delete(&pool, t.id).await.unwrap());
        assert!(find_all(&pool).await.unwrap().is_empty());
    }
}

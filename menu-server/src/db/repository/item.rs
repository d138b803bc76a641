//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{ITEM_NAME_MAX_LEN, Item, ItemCreate, ItemFilter, ItemUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, category_id, name, description, price, available, image, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool, filter: &ItemFilter) -> RepoResult<Vec<Item>> {
    let rows = sqlx::query_as::<_, Item>(&format!(
        "SELECT {COLUMNS} FROM item WHERE (?1 IS NULL OR category_id = ?1) AND (?2 = 0 OR available = 1) ORDER BY category_id, name"
    ))
    .bind(filter.category_id)
    .bind(filter.available_only)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Item>> {
    let row = sqlx::query_as::<_, Item>(&format!("SELECT {COLUMNS} FROM item WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ItemCreate) -> RepoResult<Item> {
    let name = validate_name(&data.name)?;
    validate_price(data.price)?;
    ensure_category(pool, data.category_id).await?;

    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO item (category_id, name, description, price, available, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(data.category_id)
    .bind(name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.available.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ItemUpdate) -> RepoResult<Item> {
    let mut item = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))?;

    if let Some(category_id) = data.category_id {
        ensure_category(pool, category_id).await?;
        item.category_id = category_id;
    }
    if let Some(name) = data.name.as_deref() {
        item.name = validate_name(name)?.to_string();
    }
    if let Some(description) = data.description {
        item.description = description;
    }
    if let Some(price) = data.price {
        validate_price(price)?;
        item.price = price;
    }
    if let Some(available) = data.available {
        item.available = available;
    }

    sqlx::query(
        "UPDATE item SET category_id = ?, name = ?, description = ?, price = ?, available = ?, updated_at = ? WHERE id = ?",
    )
    .bind(item.category_id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.price)
    .bind(item.available)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
}

/// Point the item at an uploaded image (relative path), or clear it
pub async fn set_image(pool: &SqlitePool, id: i64, image: Option<&str>) -> RepoResult<Item> {
    let rows = sqlx::query("UPDATE item SET image = ?, updated_at = ? WHERE id = ?")
        .bind(image)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(format!("Item {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

async fn ensure_category(pool: &SqlitePool, category_id: i64) -> RepoResult<()> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM category WHERE id = ?")
        .bind(category_id)
        .fetch_optional(pool)
        .await?;
    match exists {
        Some(_) => Ok(()),
        None => Err(RepoError::NotFound(format!("Category {category_id} not found"))),
    }
}

fn validate_name(name: &str) -> RepoResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("Item name must not be empty".into()));
    }
    if name.chars().count() > ITEM_NAME_MAX_LEN {
        return Err(RepoError::Validation(format!(
            "Item name exceeds {ITEM_NAME_MAX_LEN} characters"
        )));
    }
    Ok(name)
}

fn validate_price(price: f64) -> RepoResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(RepoError::Validation(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_menu, test_pool};

    fn new_item(category_id: i64, name: &str, price: f64) -> ItemCreate {
        ItemCreate {
            category_id,
            name: name.into(),
            description: String::new(),
            price,
            available: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_available() {
        let pool = test_pool().await;
        seed_menu(&pool).await;
        let item = create(&pool, new_item(1, "Fries", 3.0)).await.unwrap();
        assert!(item.available);
        assert!(item.image.is_none());
        assert_eq!(item.created_at, item.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let pool = test_pool().await;
        seed_menu(&pool).await;
        assert!(matches!(
            create(&pool, new_item(1, "Fries", -1.0)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            create(&pool, new_item(1, &"x".repeat(151), 1.0)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            create(&pool, new_item(9, "Fries", 1.0)).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_filter_available_and_category() {
        let pool = test_pool().await;
        seed_menu(&pool).await;
        assert_eq!(find_all(&pool, &ItemFilter::default()).await.unwrap().len(), 2);

        let available = ItemFilter { category_id: None, available_only: true };
        let rows = find_all(&pool, &available).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Burger");

        let other = ItemFilter { category_id: Some(2), available_only: false };
        assert!(find_all(&pool, &other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_set_image() {
        let pool = test_pool().await;
        seed_menu(&pool).await;
        let item = update(
            &pool,
            2,
            ItemUpdate { available: Some(true), price: Some(5.0), ..Default::default() },
        )
        .await
        .unwrap();
        assert!(item.available);
        assert_eq!(item.price, 5.0);
        assert_eq!(item.name, "Soup");

        let item = set_image(&pool, 2, Some("media/images/items/abc.jpg")).await.unwrap();
        assert_eq!(item.image.as_deref(), Some("media/images/items/abc.jpg"));
        assert!(matches!(set_image(&pool, 77, None).await.unwrap_err(), RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_category_delete_cascades() {
        let pool = test_pool().await;
        seed_menu(&pool).await;
        crate::db::repository::category::delete(&pool, 1).await.unwrap();
        assert!(find_all(&pool, &ItemFilter::default()).await.unwrap().is_empty());
    }
}

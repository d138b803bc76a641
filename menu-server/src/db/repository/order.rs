//! Order Repository
//!
//! Orders, their lines, and the three flag transitions. The transitions are
//! conditional updates that report whether they fired, so a caller holding
//! the transaction can attach exactly one notification to each change.

use super::{RepoError, RepoResult, begin_write, comment};
use crate::utils::money;
use shared::models::{Order, OrderDetail, OrderFilter, OrderLine, OrderSummary};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, table_id, ordered, canceled, order_accept, created_at, updated_at, ordered_at";

/// Draft = still editable at the table
const DRAFT: &str = "ordered = 0 AND canceled = 0";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The table's most recent draft order
pub async fn find_open_for_table(pool: &SqlitePool, table_id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE table_id = ? AND {DRAFT} ORDER BY id DESC LIMIT 1"
    ))
    .bind(table_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a new draft order for a table
pub async fn create_for_table(pool: &SqlitePool, table_id: i64) -> RepoResult<Order> {
    let mut conn = pool.acquire().await?;
    let id = insert_draft(&mut *conn, table_id).await?;
    drop(conn);

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Return the table's draft order, creating one if none is open
pub async fn open_for_table(pool: &SqlitePool, table_id: i64) -> RepoResult<Order> {
    let mut tx = begin_write(pool).await?;
    let existing: Option<(i64,)> = sqlx::query_as(&format!(
        "SELECT id FROM orders WHERE table_id = ? AND {DRAFT} ORDER BY id DESC LIMIT 1"
    ))
    .bind(table_id)
    .fetch_optional(&mut *tx)
    .await?;

    let id = match existing {
        Some((id,)) => id,
        None => insert_draft(&mut *tx, table_id).await?,
    };
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to open order".into()))
}

async fn insert_draft(conn: &mut SqliteConnection, table_id: i64) -> RepoResult<i64> {
    let table: Option<(i64,)> = sqlx::query_as("SELECT id FROM dining_table WHERE id = ?")
        .bind(table_id)
        .fetch_optional(&mut *conn)
        .await?;
    if table.is_none() {
        return Err(RepoError::NotFound(format!("Table {table_id} not found")));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query("INSERT INTO orders (table_id, created_at, updated_at) VALUES (?1, ?2, ?2)")
        .bind(table_id)
        .bind(now)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(id)
}

/// Order lines joined with item name and price
pub async fn lines(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderLine>> {
    let mut rows = sqlx::query_as::<_, OrderLine>(
        "SELECT oi.item_id, i.name, i.price, oi.count FROM order_item oi JOIN item i ON i.id = oi.item_id WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    for line in &mut rows {
        line.subtotal = money::line_total(line.price, line.count);
    }
    Ok(rows)
}

/// Number of lines on an order
pub async fn line_count(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(n)
}

/// Name of the table an order belongs to
pub async fn table_name(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT t.name FROM orders o JOIN dining_table t ON t.id = o.table_id WHERE o.id = ?",
    )
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(|(name,)| name))
}

/// Order with table name, priced lines, total and comments
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    let mut conn = pool.acquire().await?;
    let table_name = table_name(&mut *conn, id).await?.unwrap_or_default();
    drop(conn);

    let lines = lines(pool, id).await?;
    let total = money::order_total(&lines);
    let comments = comment::list_for_order(pool, id).await?;

    Ok(Some(OrderDetail {
        status: order.status(),
        order,
        table_name,
        lines,
        total,
        comments,
    }))
}

/// Add `count` of an item to a draft order, merging with an existing line.
///
/// Fails with `Conflict` when the order is no longer a draft or the item is
/// not available.
pub async fn add_item(pool: &SqlitePool, order_id: i64, item_id: i64, count: i64) -> RepoResult<()> {
    if count < 1 {
        return Err(RepoError::Validation(format!("count must be at least 1, got {count}")));
    }

    let mut tx = begin_write(pool).await?;
    let rows = sqlx::query(&format!(
        "INSERT INTO order_item (order_id, item_id, count) \
         SELECT ?1, ?2, ?3 \
         WHERE EXISTS (SELECT 1 FROM orders WHERE id = ?1 AND {DRAFT}) \
           AND EXISTS (SELECT 1 FROM item WHERE id = ?2 AND available = 1) \
         ON CONFLICT (order_id, item_id) DO UPDATE SET count = count + excluded.count"
    ))
    .bind(order_id)
    .bind(item_id)
    .bind(count)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::Conflict(format!(
            "Item {item_id} cannot be added to order {order_id}"
        )));
    }

    touch(&mut *tx, order_id).await?;
    tx.commit().await?;
    Ok(())
}

/// Set the count of a line on a draft order; 0 removes the line
pub async fn set_item_count(
    pool: &SqlitePool,
    order_id: i64,
    item_id: i64,
    count: i64,
) -> RepoResult<()> {
    if count < 0 {
        return Err(RepoError::Validation(format!("count must not be negative, got {count}")));
    }
    if count == 0 {
        return match remove_item(pool, order_id, item_id).await? {
            true => Ok(()),
            false => Err(RepoError::NotFound(format!(
                "Item {item_id} is not on order {order_id}"
            ))),
        };
    }

    let mut tx = begin_write(pool).await?;
    let rows = sqlx::query(&format!(
        "UPDATE order_item SET count = ?3 WHERE order_id = ?1 AND item_id = ?2 \
         AND EXISTS (SELECT 1 FROM orders WHERE id = ?1 AND {DRAFT})"
    ))
    .bind(order_id)
    .bind(item_id)
    .bind(count)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!(
            "Item {item_id} is not on order {order_id}"
        )));
    }

    touch(&mut *tx, order_id).await?;
    tx.commit().await?;
    Ok(())
}

/// Remove a line from a draft order. Returns whether a line was removed.
pub async fn remove_item(pool: &SqlitePool, order_id: i64, item_id: i64) -> RepoResult<bool> {
    let mut tx = begin_write(pool).await?;
    let rows = sqlx::query(&format!(
        "DELETE FROM order_item WHERE order_id = ?1 AND item_id = ?2 \
         AND EXISTS (SELECT 1 FROM orders WHERE id = ?1 AND {DRAFT})"
    ))
    .bind(order_id)
    .bind(item_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if rows > 0 {
        touch(&mut *tx, order_id).await?;
    }
    tx.commit().await?;
    Ok(rows > 0)
}

async fn touch(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET updated_at = ? WHERE id = ?")
        .bind(shared::util::now_millis())
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

fn filter_clause(filter: &OrderFilter) -> String {
    let status = filter.status.map(|s| s.sql_predicate()).unwrap_or("1 = 1");
    format!("({status}) AND (?1 IS NULL OR table_id = ?1)")
}

/// One page of orders, newest first, plus the total matching the filter
pub async fn list(
    pool: &SqlitePool,
    filter: &OrderFilter,
    per_page: u32,
    offset: i64,
) -> RepoResult<(Vec<OrderSummary>, u64)> {
    let clause = filter_clause(filter);

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM orders WHERE {clause}"))
        .bind(filter.table_id)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, OrderSummary>(&format!(
        "SELECT o.id, o.table_id, t.name AS table_name, o.ordered, o.canceled, o.order_accept, \
           (SELECT COALESCE(SUM(oi.count), 0) FROM order_item oi WHERE oi.order_id = o.id) AS item_count, \
           (SELECT COUNT(*) FROM comment c WHERE c.order_id = o.id) AS comment_count, \
           o.created_at, o.ordered_at \
         FROM orders o JOIN dining_table t ON t.id = o.table_id \
         WHERE o.id IN (SELECT id FROM orders WHERE {clause}) \
         ORDER BY o.id DESC LIMIT ?2 OFFSET ?3"
    ))
    .bind(filter.table_id)
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((
        rows.into_iter().map(OrderSummary::with_status).collect(),
        total.max(0) as u64,
    ))
}

/// Delete one order with its lines and comments
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

/// Delete every order matching the filter. Returns how many were removed.
pub async fn delete_all(pool: &SqlitePool, filter: &OrderFilter) -> RepoResult<u64> {
    let rows = sqlx::query(&format!("DELETE FROM orders WHERE {}", filter_clause(filter)))
        .bind(filter.table_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows)
}

// ========== Transitions (caller owns the transaction) ==========

/// draft -> pending. Requires at least one line.
pub async fn mark_ordered(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET ordered = 1, ordered_at = ?2, updated_at = ?2 \
         WHERE id = ?1 AND ordered = 0 AND canceled = 0 \
         AND EXISTS (SELECT 1 FROM order_item WHERE order_id = ?1)",
    )
    .bind(id)
    .bind(now)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// pending -> canceled
pub async fn mark_canceled(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET canceled = 1, updated_at = ?2 \
         WHERE id = ?1 AND canceled = 0 AND ordered = 1 AND order_accept = 0",
    )
    .bind(id)
    .bind(shared::util::now_millis())
    .execute(&mut *conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// pending -> accepted
pub async fn mark_accepted(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET order_accept = 1, updated_at = ?2 \
         WHERE id = ?1 AND order_accept = 0 AND ordered = 1 AND canceled = 0",
    )
    .bind(id)
    .bind(shared::util::now_millis())
    .execute(&mut *conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{file_pool, seed_menu, test_pool};
    use shared::models::OrderStatus;

    async fn placed(pool: &SqlitePool, table_id: i64, item_id: i64) -> i64 {
        let order = create_for_table(pool, table_id).await.unwrap();
        add_item(pool, order.id, item_id, 1).await.unwrap();
        let mut tx = pool.begin().await.unwrap();
        assert!(mark_ordered(&mut *tx, order.id).await.unwrap());
        tx.commit().await.unwrap();
        order.id
    }

    #[tokio::test]
    async fn test_open_for_table_reuses_draft() {
        let pool = test_pool().await;
        let (table, _, _) = seed_menu(&pool).await;
        let a = open_for_table(&pool, table).await.unwrap();
        let b = open_for_table(&pool, table).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.status(), OrderStatus::Draft);

        assert!(matches!(
            open_for_table(&pool, 404).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_open_shares_one_draft() {
        let (_dir, pool) = file_pool().await;
        let (table, burger, _) = seed_menu(&pool).await;

        for _ in 0..10 {
            let handles: Vec<_> = (0..5)
                .map(|_| {
                    let pool = pool.clone();
                    tokio::spawn(async move { open_for_table(&pool, table).await })
                })
                .collect();
            let mut ids = Vec::new();
            for h in handles {
                ids.push(h.await.unwrap().unwrap().id);
            }
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 1);

            // place it so the next round opens a fresh draft
            add_item(&pool, ids[0], burger, 1).await.unwrap();
            let mut tx = begin_write(&pool).await.unwrap();
            assert!(mark_ordered(&mut *tx, ids[0]).await.unwrap());
            tx.commit().await.unwrap();
        }

        let (drafts,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM orders WHERE {DRAFT}"))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(drafts, 0);
    }

    #[tokio::test]
    async fn test_add_item_merges_and_prices_lines() {
        let pool = test_pool().await;
        let (table, burger, _) = seed_menu(&pool).await;
        let order = create_for_table(&pool, table).await.unwrap();

        add_item(&pool, order.id, burger, 1).await.unwrap();
        add_item(&pool, order.id, burger, 2).await.unwrap();

        let rows = lines(&pool, order.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[0].subtotal, 28.5);

        let detail = find_detail(&pool, order.id).await.unwrap().unwrap();
        assert_eq!(detail.total, 28.5);
        assert_eq!(detail.table_name, "T1");
    }

    #[tokio::test]
    async fn test_add_item_guards() {
        let pool = test_pool().await;
        let (table, burger, soup) = seed_menu(&pool).await;
        let order = create_for_table(&pool, table).await.unwrap();

        // unavailable item
        assert!(matches!(
            add_item(&pool, order.id, soup, 1).await.unwrap_err(),
            RepoError::Conflict(_)
        ));
        assert!(matches!(
            add_item(&pool, order.id, burger, 0).await.unwrap_err(),
            RepoError::Validation(_)
        ));

        // placed orders are locked
        let placed_id = placed(&pool, table, burger).await;
        assert!(matches!(
            add_item(&pool, placed_id, burger, 1).await.unwrap_err(),
            RepoError::Conflict(_)
        ));
        assert!(!remove_item(&pool, placed_id, burger).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_item_count() {
        let pool = test_pool().await;
        let (table, burger, _) = seed_menu(&pool).await;
        let order = create_for_table(&pool, table).await.unwrap();
        add_item(&pool, order.id, burger, 1).await.unwrap();

        set_item_count(&pool, order.id, burger, 4).await.unwrap();
        assert_eq!(lines(&pool, order.id).await.unwrap()[0].count, 4);

        set_item_count(&pool, order.id, burger, 0).await.unwrap();
        assert!(lines(&pool, order.id).await.unwrap().is_empty());

        assert!(matches!(
            set_item_count(&pool, order.id, burger, 2).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_transitions_fire_once() {
        let pool = test_pool().await;
        let (table, burger, _) = seed_menu(&pool).await;

        // empty orders cannot be placed
        let empty = create_for_table(&pool, table).await.unwrap();
        let mut tx = pool.begin().await.unwrap();
        assert!(!mark_ordered(&mut *tx, empty.id).await.unwrap());
        tx.commit().await.unwrap();

        let id = placed(&pool, table, burger).await;
        let mut tx = pool.begin().await.unwrap();
        assert!(!mark_ordered(&mut *tx, id).await.unwrap());
        assert!(mark_accepted(&mut *tx, id).await.unwrap());
        assert!(!mark_accepted(&mut *tx, id).await.unwrap());
        // accepted orders cannot be canceled
        assert!(!mark_canceled(&mut *tx, id).await.unwrap());
        tx.commit().await.unwrap();

        let order = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Accepted);
        assert!(order.ordered_at.is_some());
    }

    #[tokio::test]
    async fn test_cancel_blocks_accept() {
        let pool = test_pool().await;
        let (table, burger, _) = seed_menu(&pool).await;
        let id = placed(&pool, table, burger).await;

        let mut tx = pool.begin().await.unwrap();
        assert!(mark_canceled(&mut *tx, id).await.unwrap());
        assert!(!mark_canceled(&mut *tx, id).await.unwrap());
        assert!(!mark_accepted(&mut *tx, id).await.unwrap());
        tx.commit().await.unwrap();

        let order = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Canceled);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let pool = test_pool().await;
        let (table, burger, _) = seed_menu(&pool).await;
        for _ in 0..3 {
            placed(&pool, table, burger).await;
        }
        create_for_table(&pool, table).await.unwrap();

        let (rows, total) = list(&pool, &OrderFilter::default(), 2, 0).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].id > rows[1].id);

        let pending = OrderFilter { status: Some(OrderStatus::Pending), table_id: None };
        let (rows, total) = list(&pool, &pending, 2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, OrderStatus::Pending);
        assert_eq!(rows[0].item_count, 1);
        assert_eq!(rows[0].table_name, "T1");

        let drafts = OrderFilter { status: Some(OrderStatus::Draft), table_id: Some(table) };
        assert_eq!(list(&pool, &drafts, 10, 0).await.unwrap().1, 1);
    }

    #[tokio::test]
    async fn test_delete_and_delete_all() {
        let pool = test_pool().await;
        let (table, burger, _) = seed_menu(&pool).await;
        let a = placed(&pool, table, burger).await;
        placed(&pool, table, burger).await;
        create_for_table(&pool, table).await.unwrap();

        assert!(delete(&pool, a).await.unwrap());
        assert!(!delete(&pool, a).await.unwrap());
        assert!(lines(&pool, a).await.unwrap().is_empty());

        let pending = OrderFilter { status: Some(OrderStatus::Pending), table_id: None };
        assert_eq!(delete_all(&pool, &pending).await.unwrap(), 1);
        assert_eq!(delete_all(&pool, &OrderFilter::default()).await.unwrap(), 1);
        assert_eq!(list(&pool, &OrderFilter::default(), 10, 0).await.unwrap().1, 0);
    }
}

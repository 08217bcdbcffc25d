//! Order database operations

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::OrderStatus;
use sqlx::PgConnection;

use super::PgUnitOfWork;
use crate::db::models::{Order, OrderDraft, OrderItem, OrderItemDraft};
use crate::db::{OrderStore, RepoError, RepoResult};

const ORDER_COLUMNS: &str = "id, customer_id, payment_method, status, subtotal, tax, discount, \
                             total, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    payment_method: String,
    status: String,
    subtotal: Decimal,
    tax: Decimal,
    discount: Decimal,
    total: Decimal,
    created_at: i64,
    updated_at: i64,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    product_code: Option<String>,
    product_name: Option<String>,
    quantity: i32,
    unit_price: Decimal,
    discount: Decimal,
    has_tax: bool,
}

impl From<ItemRow> for OrderItem {
    fn from(row: ItemRow) -> Self {
        OrderItem {
            id: row.id,
            product_id: row.product_id,
            product_code: row.product_code,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            discount: row.discount,
            has_tax: row.has_tax,
        }
    }
}

/// Load items for the given orders and attach them, keeping row order
async fn attach_items(conn: &mut PgConnection, rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let items: Vec<ItemRow> = sqlx::query_as(
        r#"
        SELECT i.id, i.order_id, i.product_id, p.code AS product_code, p.name AS product_name,
               i.quantity, i.unit_price, i.discount, i.has_tax
        FROM order_items i
        LEFT JOIN products p ON p.id = i.product_id
        WHERE i.order_id = ANY($1)
        ORDER BY i.order_id, i.position
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item.into());
    }

    rows.into_iter()
        .map(|row| {
            let status = row.status.parse::<OrderStatus>().map_err(|e| {
                RepoError::Database(format!("order {} has invalid status: {e}", row.id))
            })?;
            Ok(Order {
                id: row.id,
                customer_id: row.customer_id,
                payment_method: row.payment_method,
                status,
                subtotal: row.subtotal,
                tax: row.tax,
                discount: row.discount,
                total: row.total,
                items: by_order.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .collect()
}

async fn insert_items(
    conn: &mut PgConnection,
    order_id: i64,
    items: &[OrderItemDraft],
) -> RepoResult<()> {
    if items.is_empty() {
        return Ok(());
    }
    let positions: Vec<i32> = (0..items.len() as i32).collect();
    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let unit_prices: Vec<Decimal> = items.iter().map(|i| i.unit_price).collect();
    let discounts: Vec<Decimal> = items.iter().map(|i| i.discount).collect();
    let taxes: Vec<bool> = items.iter().map(|i| i.has_tax).collect();
    sqlx::query(
        r#"
        INSERT INTO order_items (order_id, product_id, position, quantity, unit_price, discount, has_tax)
        SELECT $1::bigint, u.product_id, u.position, u.quantity, u.unit_price, u.discount, u.has_tax
        FROM UNNEST($2::bigint[], $3::integer[], $4::integer[], $5::numeric[], $6::numeric[], $7::boolean[])
            AS u(product_id, position, quantity, unit_price, discount, has_tax)
        "#,
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&positions)
    .bind(&quantities)
    .bind(&unit_prices)
    .bind(&discounts)
    .bind(&taxes)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl OrderStore for PgUnitOfWork {
    async fn all_orders(&mut self) -> RepoResult<Vec<Order>> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"))
                .fetch_all(&mut *self.tx)
                .await?;
        attach_items(&mut *self.tx, rows).await
    }

    async fn order_by_id(&mut self, id: i64) -> RepoResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(attach_items(&mut *self.tx, vec![row]).await?.pop())
    }

    async fn orders_by_customer(&mut self, customer_id: i64) -> RepoResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(&mut *self.tx)
        .await?;
        attach_items(&mut *self.tx, rows).await
    }

    async fn create_order(&mut self, draft: &OrderDraft) -> RepoResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO orders (
                customer_id, payment_method, status, subtotal, tax, discount, total,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(draft.customer_id)
        .bind(&draft.payment_method)
        .bind(draft.status.as_str())
        .bind(draft.subtotal)
        .bind(draft.tax)
        .bind(draft.discount)
        .bind(draft.total)
        .bind(draft.created_at)
        .bind(draft.updated_at)
        .fetch_one(&mut *self.tx)
        .await?;

        insert_items(&mut *self.tx, id, &draft.items).await?;
        Ok(id)
    }

    async fn update_order(&mut self, id: i64, draft: &OrderDraft) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE orders
            SET customer_id = $2, payment_method = $3, status = $4, subtotal = $5,
                tax = $6, discount = $7, total = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(draft.customer_id)
        .bind(&draft.payment_method)
        .bind(draft.status.as_str())
        .bind(draft.subtotal)
        .bind(draft.tax)
        .bind(draft.discount)
        .bind(draft.total)
        .bind(draft.updated_at)
        .execute(&mut *self.tx)
        .await?;
        if rows.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        insert_items(&mut *self.tx, id, &draft.items).await?;
        Ok(true)
    }

    async fn update_order_status(
        &mut self,
        id: i64,
        status: OrderStatus,
        updated_at: i64,
    ) -> RepoResult<bool> {
        let rows = sqlx::query("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(updated_at)
            .execute(&mut *self.tx)
            .await?;
        Ok(rows.rows_affected() > 0)
    }

    async fn delete_order(&mut self, id: i64) -> RepoResult<bool> {
        let rows = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(rows.rows_affected() > 0)
    }
}

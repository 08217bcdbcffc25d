//! Product database operations

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::PgUnitOfWork;
use crate::db::models::{Product, ProductDraft};
use crate::db::{ProductStore, RepoResult};

const PRODUCT_COLUMNS: &str = "id, code, name, sale_price, stock, has_tax";

#[async_trait]
impl ProductStore for PgUnitOfWork {
    async fn all_products(&mut self) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn product_by_id(&mut self, id: i64) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn product_for_update(&mut self, id: i64) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn products_by_ids(&mut self, ids: &[i64]) -> RepoResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // Lock in id order so two transactions never wait on each other crosswise
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn create_product(&mut self, draft: &ProductDraft) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (code, name, sale_price, stock, has_tax)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&draft.code)
        .bind(&draft.name)
        .bind(draft.sale_price)
        .bind(draft.stock)
        .bind(draft.has_tax)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn update_product(&mut self, product: &Product) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE products
            SET code = $2, name = $3, sale_price = $4, stock = $5, has_tax = $6
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.sale_price)
        .bind(product.stock)
        .bind(product.has_tax)
        .execute(&mut *self.tx)
        .await?;
        Ok(rows.rows_affected() > 0)
    }

    async fn delete_product(&mut self, id: i64) -> RepoResult<bool> {
        let rows = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(rows.rows_affected() > 0)
    }

    async fn update_products(&mut self, products: &[Product]) -> RepoResult<()> {
        if products.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let codes: Vec<String> = products.iter().map(|p| p.code.clone()).collect();
        let names: Vec<String> = products.iter().map(|p| p.name.clone()).collect();
        let prices: Vec<Decimal> = products.iter().map(|p| p.sale_price).collect();
        let stocks: Vec<i32> = products.iter().map(|p| p.stock).collect();
        let taxes: Vec<Option<bool>> = products.iter().map(|p| p.has_tax).collect();
        sqlx::query(
            r#"
            UPDATE products AS p
            SET code = u.code, name = u.name, sale_price = u.sale_price,
                stock = u.stock, has_tax = u.has_tax
            FROM UNNEST($1::bigint[], $2::text[], $3::text[], $4::numeric[], $5::integer[], $6::boolean[])
                AS u(id, code, name, sale_price, stock, has_tax)
            WHERE p.id = u.id
            "#,
        )
        .bind(&ids)
        .bind(&codes)
        .bind(&names)
        .bind(&prices)
        .bind(&stocks)
        .bind(&taxes)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn paged_products(
        &mut self,
        offset: i64,
        limit: i64,
    ) -> RepoResult<(Vec<Product>, i64)> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *self.tx)
            .await?;
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok((rows, total))
    }
}

//! Customer database operations

use async_trait::async_trait;

use super::PgUnitOfWork;
use crate::db::models::{Customer, CustomerDraft};
use crate::db::{CustomerStore, RepoResult};

const CUSTOMER_COLUMNS: &str = "id, name, tax_id, phone, address, is_final_consumer";

#[async_trait]
impl CustomerStore for PgUnitOfWork {
    async fn all_customers(&mut self) -> RepoResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id"
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn customer_by_id(&mut self, id: i64) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn create_customer(&mut self, draft: &CustomerDraft) -> RepoResult<Customer> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, tax_id, phone, address, is_final_consumer)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&draft.name)
        .bind(&draft.tax_id)
        .bind(&draft.phone)
        .bind(&draft.address)
        .bind(draft.is_final_consumer)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn update_customer(&mut self, customer: &Customer) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, tax_id = $3, phone = $4, address = $5, is_final_consumer = $6
            WHERE id = $1
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.tax_id)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.is_final_consumer)
        .execute(&mut *self.tx)
        .await?;
        Ok(rows.rows_affected() > 0)
    }

    async fn delete_customer(&mut self, id: i64) -> RepoResult<bool> {
        let rows = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(rows.rows_affected() > 0)
    }
}

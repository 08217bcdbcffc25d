//! In-process engine
//!
//! State sits behind a tokio mutex. A unit of work holds the lock for its
//! whole life and edits a private copy, which replaces the shared state
//! on commit. Constraint checks mirror the PostgreSQL schema (unique
//! codes and tax ids, foreign keys, non-negative stock).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::OrderStatus;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::models::{
    Customer, CustomerDraft, Order, OrderDraft, OrderItem, Product, ProductDraft,
};
use super::{
    CustomerStore, Database, OrderStore, ProductStore, RepoError, RepoResult, UnitOfWork,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    customers: BTreeMap<i64, Customer>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    last_customer_id: i64,
    last_product_id: i64,
    last_order_id: i64,
    last_item_id: i64,
}

impl MemoryState {
    /// Fill product code/name the way the SQL join does
    fn hydrate(&self, order: &Order) -> Order {
        let mut order = order.clone();
        for item in &mut order.items {
            let product = self.products.get(&item.product_id);
            item.product_code = product.map(|p| p.code.clone());
            item.product_name = product.map(|p| p.name.clone());
        }
        order
    }

    fn check_order_refs(&self, draft: &OrderDraft) -> RepoResult<()> {
        if !self.customers.contains_key(&draft.customer_id) {
            return Err(RepoError::Validation(format!(
                "customer {} does not exist",
                draft.customer_id
            )));
        }
        for item in &draft.items {
            if !self.products.contains_key(&item.product_id) {
                return Err(RepoError::Validation(format!(
                    "product {} does not exist",
                    item.product_id
                )));
            }
            if item.quantity <= 0 {
                return Err(RepoError::Validation(format!(
                    "quantity must be positive, got {}",
                    item.quantity
                )));
            }
        }
        Ok(())
    }

    fn build_items(&mut self, draft: &OrderDraft) -> Vec<OrderItem> {
        draft
            .items
            .iter()
            .map(|item| {
                self.last_item_id += 1;
                OrderItem {
                    id: self.last_item_id,
                    product_id: item.product_id,
                    product_code: None,
                    product_name: None,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    discount: item.discount,
                    has_tax: item.has_tax,
                }
            })
            .collect()
    }

    fn check_product(&self, id: i64, code: &str, sale_price: Decimal, stock: i32) -> RepoResult<()> {
        if self.products.values().any(|p| p.id != id && p.code == code) {
            return Err(RepoError::Duplicate(format!("product code {code}")));
        }
        if sale_price <= Decimal::ZERO {
            return Err(RepoError::Validation("sale_price must be positive".into()));
        }
        if stock < 0 {
            return Err(RepoError::Validation(format!(
                "stock must not be negative, got {stock}"
            )));
        }
        Ok(())
    }

    fn check_customer(&self, id: i64, tax_id: Option<&str>) -> RepoResult<()> {
        if let Some(tax_id) = tax_id
            && self
                .customers
                .values()
                .any(|c| c.id != id && c.tax_id.as_deref() == Some(tax_id))
        {
            return Err(RepoError::Duplicate(format!("customer tax id {tax_id}")));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Tx = MemoryUnitOfWork;

    async fn begin(&self) -> RepoResult<MemoryUnitOfWork> {
        let guard = self.state.clone().lock_owned().await;
        let work = (*guard).clone();
        Ok(MemoryUnitOfWork { guard, work })
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }

    fn engine(&self) -> &'static str {
        "memory"
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self) -> RepoResult<()> {
        let MemoryUnitOfWork { mut guard, work } = self;
        *guard = work;
        Ok(())
    }

    async fn rollback(self) -> RepoResult<()> {
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryUnitOfWork {
    async fn all_orders(&mut self) -> RepoResult<Vec<Order>> {
        Ok(self
            .work
            .orders
            .values()
            .map(|o| self.work.hydrate(o))
            .collect())
    }

    async fn order_by_id(&mut self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.work.orders.get(&id).map(|o| self.work.hydrate(o)))
    }

    async fn orders_by_customer(&mut self, customer_id: i64) -> RepoResult<Vec<Order>> {
        Ok(self
            .work
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .map(|o| self.work.hydrate(o))
            .collect())
    }

    async fn create_order(&mut self, draft: &OrderDraft) -> RepoResult<i64> {
        self.work.check_order_refs(draft)?;
        self.work.last_order_id += 1;
        let id = self.work.last_order_id;
        let items = self.work.build_items(draft);
        self.work.orders.insert(
            id,
            Order {
                id,
                customer_id: draft.customer_id,
                payment_method: draft.payment_method.clone(),
                status: draft.status,
                subtotal: draft.subtotal,
                tax: draft.tax,
                discount: draft.discount,
                total: draft.total,
                items,
                created_at: draft.created_at,
                updated_at: draft.updated_at,
            },
        );
        Ok(id)
    }

    async fn update_order(&mut self, id: i64, draft: &OrderDraft) -> RepoResult<bool> {
        if !self.work.orders.contains_key(&id) {
            return Ok(false);
        }
        self.work.check_order_refs(draft)?;
        let items = self.work.build_items(draft);
        if let Some(order) = self.work.orders.get_mut(&id) {
            order.customer_id = draft.customer_id;
            order.payment_method = draft.payment_method.clone();
            order.status = draft.status;
            order.subtotal = draft.subtotal;
            order.tax = draft.tax;
            order.discount = draft.discount;
            order.total = draft.total;
            order.items = items;
            order.updated_at = draft.updated_at;
        }
        Ok(true)
    }

    async fn update_order_status(
        &mut self,
        id: i64,
        status: OrderStatus,
        updated_at: i64,
    ) -> RepoResult<bool> {
        match self.work.orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                order.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_order(&mut self, id: i64) -> RepoResult<bool> {
        Ok(self.work.orders.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductStore for MemoryUnitOfWork {
    async fn all_products(&mut self) -> RepoResult<Vec<Product>> {
        Ok(self.work.products.values().cloned().collect())
    }

    async fn product_by_id(&mut self, id: i64) -> RepoResult<Option<Product>> {
        Ok(self.work.products.get(&id).cloned())
    }

    async fn product_for_update(&mut self, id: i64) -> RepoResult<Option<Product>> {
        Ok(self.work.products.get(&id).cloned())
    }

    async fn products_by_ids(&mut self, ids: &[i64]) -> RepoResult<Vec<Product>> {
        Ok(self
            .work
            .products
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_product(&mut self, draft: &ProductDraft) -> RepoResult<Product> {
        self.work
            .check_product(0, &draft.code, draft.sale_price, draft.stock)?;
        self.work.last_product_id += 1;
        let product = Product {
            id: self.work.last_product_id,
            code: draft.code.clone(),
            name: draft.name.clone(),
            sale_price: draft.sale_price,
            stock: draft.stock,
            has_tax: draft.has_tax,
        };
        self.work.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&mut self, product: &Product) -> RepoResult<bool> {
        if !self.work.products.contains_key(&product.id) {
            return Ok(false);
        }
        self.work
            .check_product(product.id, &product.code, product.sale_price, product.stock)?;
        self.work.products.insert(product.id, product.clone());
        Ok(true)
    }

    async fn delete_product(&mut self, id: i64) -> RepoResult<bool> {
        let referenced = self
            .work
            .orders
            .values()
            .any(|o| o.items.iter().any(|i| i.product_id == id));
        if referenced {
            return Err(RepoError::Validation(format!(
                "product {id} is referenced by order items"
            )));
        }
        Ok(self.work.products.remove(&id).is_some())
    }

    async fn update_products(&mut self, products: &[Product]) -> RepoResult<()> {
        for product in products {
            if self.work.products.contains_key(&product.id) {
                self.work.check_product(
                    product.id,
                    &product.code,
                    product.sale_price,
                    product.stock,
                )?;
                self.work.products.insert(product.id, product.clone());
            }
        }
        Ok(())
    }

    async fn paged_products(
        &mut self,
        offset: i64,
        limit: i64,
    ) -> RepoResult<(Vec<Product>, i64)> {
        let total = self.work.products.len() as i64;
        let items = self
            .work
            .products
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }
}

#[async_trait]
impl CustomerStore for MemoryUnitOfWork {
    async fn all_customers(&mut self) -> RepoResult<Vec<Customer>> {
        Ok(self.work.customers.values().cloned().collect())
    }

    async fn customer_by_id(&mut self, id: i64) -> RepoResult<Option<Customer>> {
        Ok(self.work.customers.get(&id).cloned())
    }

    async fn create_customer(&mut self, draft: &CustomerDraft) -> RepoResult<Customer> {
        self.work.check_customer(0, draft.tax_id.as_deref())?;
        self.work.last_customer_id += 1;
        let customer = Customer {
            id: self.work.last_customer_id,
            name: draft.name.clone(),
            tax_id: draft.tax_id.clone(),
            phone: draft.phone.clone(),
            address: draft.address.clone(),
            is_final_consumer: draft.is_final_consumer,
        };
        self.work.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(&mut self, customer: &Customer) -> RepoResult<bool> {
        if !self.work.customers.contains_key(&customer.id) {
            return Ok(false);
        }
        self.work
            .check_customer(customer.id, customer.tax_id.as_deref())?;
        self.work.customers.insert(customer.id, customer.clone());
        Ok(true)
    }

    async fn delete_customer(&mut self, id: i64) -> RepoResult<bool> {
        if self.work.orders.values().any(|o| o.customer_id == id) {
            return Err(RepoError::Validation(format!(
                "customer {id} is referenced by orders"
            )));
        }
        Ok(self.work.customers.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(code: &str, stock: i32) -> ProductDraft {
        ProductDraft {
            code: code.to_string(),
            name: format!("Product {code}"),
            sale_price: Decimal::new(250, 2),
            stock,
            has_tax: Some(true),
        }
    }

    #[tokio::test]
    async fn test_commit_publishes_changes() {
        let db = MemoryDatabase::new();

        let mut tx = db.begin().await.unwrap();
        let created = tx.create_product(&draft("A1", 5)).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        assert_eq!(tx.product_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_drop_discards_changes() {
        let db = MemoryDatabase::new();

        {
            let mut tx = db.begin().await.unwrap();
            tx.create_product(&draft("A1", 5)).await.unwrap();
        }

        let mut tx = db.begin().await.unwrap();
        assert!(tx.all_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rollback_discards_changes() {
        let db = MemoryDatabase::new();

        let mut tx = db.begin().await.unwrap();
        tx.create_product(&draft("A1", 5)).await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        assert!(tx.all_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = MemoryDatabase::new();
        let mut tx = db.begin().await.unwrap();
        tx.create_product(&draft("A1", 5)).await.unwrap();

        let err = tx.create_product(&draft("A1", 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_in_batch() {
        let db = MemoryDatabase::new();
        let mut tx = db.begin().await.unwrap();
        let mut product = tx.create_product(&draft("A1", 5)).await.unwrap();

        product.stock = -1;
        let err = tx.update_products(&[product]).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_products_by_ids_skips_missing() {
        let db = MemoryDatabase::new();
        let mut tx = db.begin().await.unwrap();
        let a = tx.create_product(&draft("A1", 5)).await.unwrap();
        let b = tx.create_product(&draft("B1", 5)).await.unwrap();

        let found = tx.products_by_ids(&[b.id, 999, a.id]).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_paged_products_window() {
        let db = MemoryDatabase::new();
        let mut tx = db.begin().await.unwrap();
        for i in 0..5 {
            tx.create_product(&draft(&format!("P{i}"), 1)).await.unwrap();
        }

        let (items, total) = tx.paged_products(2, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(
            items.iter().map(|p| p.code.as_str()).collect::<Vec<_>>(),
            vec!["P2", "P3"]
        );

        let (items, total) = tx.paged_products(10, 2).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 5);
    }
}

//! Order lifecycle manager
//!
//! Every operation runs in one unit of work: stock checks, stock writes and
//! the order write commit together or not at all. Stock is consumed when an
//! order is created and only given back by delete, update (before
//! re-reserving) and cancel of a pending order.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use shared::models::{
    self as dto, OrderCreate, OrderLine, OrderReport, OrderStatus, OrderUpdate,
};
use shared::util::now_millis;
use tracing::instrument;

use super::error::{OrderError, OrderResult, Resource};
use super::money::{self, Totals};
use super::report;
use super::status;
use super::stock::StockLedger;
use crate::convert;
use crate::db::models::{Order, OrderDraft, OrderItem, OrderItemDraft};
use crate::db::{CustomerStore, Database, OrderStore, ProductStore, UnitOfWork};
use crate::utils::validation::validate_payment_method;

#[derive(Clone)]
pub struct OrderLifecycle<D: Database> {
    db: D,
}

impl<D: Database> OrderLifecycle<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    // ========== Commands ==========

    /// Reserve stock and persist a new pending order
    #[instrument(skip(self, req), fields(customer_id = req.customer_id))]
    pub async fn create(&self, req: OrderCreate) -> OrderResult<dto::Order> {
        validate_lines(&req.items)?;
        validate_payment_method(&req.payment_method)?;
        let discount = req.discount.unwrap_or(Decimal::ZERO);
        validate_discount(discount)?;

        let mut tx = self.db.begin().await?;

        if tx.customer_by_id(req.customer_id).await?.is_none() {
            return Err(OrderError::not_found(Resource::Customer, req.customer_id));
        }

        let product_ids = req.items.iter().map(|l| l.product_id);
        let mut ledger = load_ledger(&mut tx, product_ids).await?;
        let items = price_lines(&ledger, &req.items)?;
        ledger.reserve(&quantities(&items))?;

        let totals = order_totals(&items, discount)?;
        let now = now_millis();
        let draft = OrderDraft {
            customer_id: req.customer_id,
            payment_method: req.payment_method.trim().to_string(),
            status: OrderStatus::Pending,
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            items,
            created_at: now,
            updated_at: now,
        };

        tx.update_products(&ledger.touched()).await?;
        let id = tx.create_order(&draft).await?;
        let order = load_order(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = id,
            items = order.items.len(),
            total = %order.total,
            "Order created"
        );
        Ok(convert::order_to_dto(order))
    }

    /// Edit a pending order. Held stock is returned first, then the new
    /// (or unchanged) lines are reserved again.
    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: OrderUpdate) -> OrderResult<dto::Order> {
        if let Some(lines) = &req.items {
            validate_lines(lines)?;
        }
        if let Some(method) = &req.payment_method {
            validate_payment_method(method)?;
        }
        if let Some(discount) = req.discount {
            validate_discount(discount)?;
        }

        let mut tx = self.db.begin().await?;
        let order = load_order(&mut tx, id).await?;
        ensure_mutable(&order, "update")?;

        let held = held_items(&order);
        let mut product_ids: Vec<i64> = held.iter().map(|i| i.product_id).collect();
        if let Some(lines) = &req.items {
            product_ids.extend(lines.iter().map(|l| l.product_id));
        }
        let mut ledger = load_ledger(&mut tx, product_ids).await?;
        ledger.restore(&held)?;

        let items = match &req.items {
            Some(lines) => price_lines(&ledger, lines)?,
            None => held,
        };
        ledger.reserve(&quantities(&items))?;

        let totals = order_totals(&items, req.discount.unwrap_or(order.discount))?;
        let draft = OrderDraft {
            customer_id: order.customer_id,
            payment_method: req
                .payment_method
                .map(|m| m.trim().to_string())
                .unwrap_or(order.payment_method),
            status: order.status,
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            items,
            created_at: order.created_at,
            updated_at: now_millis(),
        };

        tx.update_products(&ledger.touched()).await?;
        if !tx.update_order(id, &draft).await? {
            return Err(OrderError::not_found(Resource::Order, id));
        }
        let order = load_order(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(order_id = id, total = %order.total, "Order updated");
        Ok(convert::order_to_dto(order))
    }

    /// Remove a pending order and give its stock back
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> OrderResult<()> {
        let mut tx = self.db.begin().await?;
        let order = load_order(&mut tx, id).await?;
        ensure_mutable(&order, "delete")?;

        let held = held_items(&order);
        let mut ledger = load_ledger(&mut tx, held.iter().map(|i| i.product_id)).await?;
        ledger.restore(&held)?;

        tx.update_products(&ledger.touched()).await?;
        if !tx.delete_order(id).await? {
            return Err(OrderError::not_found(Resource::Order, id));
        }
        tx.commit().await?;

        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }

    /// Move an order to the named status. Never touches stock.
    pub async fn change_status(&self, id: i64, status: &str) -> OrderResult<dto::Order> {
        let target = status
            .parse::<OrderStatus>()
            .map_err(|e| OrderError::InvalidTransition(e.0))?;
        self.transition(id, target).await
    }

    /// Cancel an order. A pending order gets its stock back; a processing
    /// order has already been picked and keeps it consumed. Cancelling a
    /// cancelled order returns it unchanged.
    ///
    /// A completed order cannot be cancelled and fails with
    /// `OrderError::InvalidState`.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: i64) -> OrderResult<dto::Order> {
        let mut tx = self.db.begin().await?;
        let order = load_order(&mut tx, id).await?;

        match order.status {
            OrderStatus::Cancelled => {
                tx.rollback().await?;
                return Ok(convert::order_to_dto(order));
            }
            OrderStatus::Completed => {
                return Err(OrderError::invalid_state(id, order.status, "cancel"));
            }
            OrderStatus::Pending => {
                let held = held_items(&order);
                let mut ledger =
                    load_ledger(&mut tx, held.iter().map(|i| i.product_id)).await?;
                ledger.restore(&held)?;
                tx.update_products(&ledger.touched()).await?;
            }
            OrderStatus::Processing => {}
        }

        tx.update_order_status(id, OrderStatus::Cancelled, now_millis())
            .await?;
        let cancelled = load_order(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(order_id = id, from = %order.status, "Order cancelled");
        Ok(convert::order_to_dto(cancelled))
    }

    pub async fn complete(&self, id: i64) -> OrderResult<dto::Order> {
        self.transition(id, OrderStatus::Completed).await
    }

    #[instrument(skip(self))]
    async fn transition(&self, id: i64, target: OrderStatus) -> OrderResult<dto::Order> {
        let mut tx = self.db.begin().await?;
        let order = load_order(&mut tx, id).await?;

        if order.status == target {
            tx.rollback().await?;
            return Ok(convert::order_to_dto(order));
        }
        if !status::can_transition(order.status, target) {
            return Err(OrderError::invalid_state(
                id,
                order.status,
                format!("move to {target}"),
            ));
        }

        tx.update_order_status(id, target, now_millis()).await?;
        let updated = load_order(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(order_id = id, from = %order.status, to = %target, "Order status changed");
        Ok(convert::order_to_dto(updated))
    }

    // ========== Queries ==========

    pub async fn get(&self, id: i64) -> OrderResult<dto::Order> {
        let mut tx = self.db.begin().await?;
        let order = load_order(&mut tx, id).await?;
        tx.commit().await?;
        Ok(convert::order_to_dto(order))
    }

    pub async fn list(&self) -> OrderResult<Vec<dto::Order>> {
        let mut tx = self.db.begin().await?;
        let orders = tx.all_orders().await?;
        tx.commit().await?;
        Ok(orders.into_iter().map(convert::order_to_dto).collect())
    }

    pub async fn list_by_customer(&self, customer_id: i64) -> OrderResult<Vec<dto::Order>> {
        let mut tx = self.db.begin().await?;
        if tx.customer_by_id(customer_id).await?.is_none() {
            return Err(OrderError::not_found(Resource::Customer, customer_id));
        }
        let orders = tx.orders_by_customer(customer_id).await?;
        tx.commit().await?;
        Ok(orders.into_iter().map(convert::order_to_dto).collect())
    }

    /// Order detail with customer data, ready to print
    pub async fn report(&self, id: i64) -> OrderResult<OrderReport> {
        let mut tx = self.db.begin().await?;
        let order = load_order(&mut tx, id).await?;
        let customer = tx.customer_by_id(order.customer_id).await?;
        tx.commit().await?;
        Ok(report::build_report(convert::order_to_dto(order), customer))
    }
}

// ========== Helpers ==========

async fn load_order<T: UnitOfWork>(tx: &mut T, id: i64) -> OrderResult<Order> {
    tx.order_by_id(id)
        .await?
        .ok_or_else(|| OrderError::not_found(Resource::Order, id))
}

async fn load_ledger<T: UnitOfWork>(
    tx: &mut T,
    product_ids: impl IntoIterator<Item = i64>,
) -> OrderResult<StockLedger> {
    let ids: Vec<i64> = product_ids
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let products = tx.products_by_ids(&ids).await?;
    Ok(StockLedger::new(products))
}

fn ensure_mutable(order: &Order, operation: &str) -> OrderResult<()> {
    if order.status.is_mutable() {
        Ok(())
    } else {
        Err(OrderError::invalid_state(order.id, order.status, operation))
    }
}

fn held_items(order: &Order) -> Vec<OrderItemDraft> {
    order.items.iter().map(OrderItem::to_draft).collect()
}

fn quantities(items: &[OrderItemDraft]) -> Vec<(i64, i32)> {
    items.iter().map(|i| (i.product_id, i.quantity)).collect()
}

/// Snapshot current sale prices onto the requested lines
fn price_lines(ledger: &StockLedger, lines: &[OrderLine]) -> OrderResult<Vec<OrderItemDraft>> {
    lines
        .iter()
        .map(|line| {
            let product = ledger.product(line.product_id)?;
            let discount = line.discount.unwrap_or(Decimal::ZERO);
            let gross = money::line_gross(line.quantity, product.sale_price)
                .filter(|g| money::in_amount_range(*g))
                .ok_or_else(|| {
                    OrderError::Validation(format!(
                        "line amount out of range for product {}",
                        line.product_id
                    ))
                })?;
            if discount > gross {
                return Err(OrderError::Validation(format!(
                    "discount {discount} exceeds line amount {gross} for product {}",
                    line.product_id
                )));
            }
            Ok(OrderItemDraft {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.sale_price,
                discount,
                has_tax: line.has_tax.or(product.has_tax).unwrap_or(false),
            })
        })
        .collect()
}

fn order_totals(items: &[OrderItemDraft], discount: Decimal) -> OrderResult<Totals> {
    money::compute_totals(items, discount).ok_or_else(|| {
        OrderError::Validation("order amounts exceed the supported range".into())
    })
}

fn validate_lines(lines: &[OrderLine]) -> OrderResult<()> {
    if lines.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(OrderError::InvalidQuantity {
                product_id: line.product_id,
                quantity: line.quantity,
            });
        }
        if let Some(discount) = line.discount {
            check_amount(discount, "discount").map_err(|msg| {
                OrderError::Validation(format!("{msg} for product {}", line.product_id))
            })?;
        }
    }
    Ok(())
}

fn validate_discount(discount: Decimal) -> OrderResult<()> {
    check_amount(discount, "discount").map_err(OrderError::Validation)
}

/// Non-negative, whole cents, within the stored range
fn check_amount(value: Decimal, field: &str) -> Result<(), String> {
    if value < Decimal::ZERO {
        return Err(format!("{field} must not be negative, got {value}"));
    }
    if !money::is_cent_precise(value) {
        return Err(format!("{field} must have at most 2 decimal places, got {value}"));
    }
    if !money::in_amount_range(value) {
        return Err(format!("{field} is out of range, got {value}"));
    }
    Ok(())
}

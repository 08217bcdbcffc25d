//! Stock reservation against a set of loaded products
//!
//! Collects every stock change of one operation in memory so the caller
//! can persist them as a single batch. `reserve` checks all lines before
//! touching any counter.

use std::collections::{BTreeMap, BTreeSet};

use crate::db::models::{OrderItemDraft, Product};

use super::error::{OrderError, OrderResult, Resource};

pub struct StockLedger {
    products: BTreeMap<i64, Product>,
    touched: BTreeSet<i64>,
}

impl StockLedger {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            touched: BTreeSet::new(),
        }
    }

    pub fn product(&self, id: i64) -> OrderResult<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| OrderError::not_found(Resource::Product, id))
    }

    /// Give back the quantities held by `items`
    pub fn restore(&mut self, items: &[OrderItemDraft]) -> OrderResult<()> {
        for item in items {
            let product = self
                .products
                .get_mut(&item.product_id)
                .ok_or_else(|| OrderError::not_found(Resource::Product, item.product_id))?;
            product.stock = product.stock.saturating_add(item.quantity);
            self.touched.insert(item.product_id);
        }
        Ok(())
    }

    /// Take the quantities for `lines`, failing without side effects if
    /// any product is missing or short. Quantities for the same product
    /// are summed before checking.
    pub fn reserve(&mut self, lines: &[(i64, i32)]) -> OrderResult<()> {
        let mut requested: BTreeMap<i64, i64> = BTreeMap::new();
        for &(product_id, quantity) in lines {
            *requested.entry(product_id).or_default() += i64::from(quantity);
        }

        for (&product_id, &quantity) in &requested {
            let product = self.product(product_id)?;
            if quantity > i64::from(product.stock) {
                return Err(OrderError::InsufficientStock {
                    product_id,
                    product_name: product.name.clone(),
                    requested: quantity,
                    available: product.stock,
                });
            }
        }

        for (product_id, quantity) in requested {
            if let Some(product) = self.products.get_mut(&product_id) {
                // quantity ≤ stock ≤ i32::MAX, checked above
                product.stock -= quantity as i32;
                self.touched.insert(product_id);
            }
        }
        Ok(())
    }

    /// Products whose stock changed, in id order
    pub fn touched(&self) -> Vec<Product> {
        self.touched
            .iter()
            .filter_map(|id| self.products.get(id).cloned())
            .collect()
    }
}

//! Application state shared by every handler

use crate::db::Database;
use crate::orders::OrderLifecycle;
use crate::services::{CustomerService, ProductService};

#[derive(Clone)]
pub struct AppState<D: Database> {
    pub db: D,
    pub orders: OrderLifecycle<D>,
    pub products: ProductService<D>,
    pub customers: CustomerService<D>,
}

impl<D: Database> AppState<D> {
    pub fn new(db: D) -> Self {
        Self {
            orders: OrderLifecycle::new(db.clone()),
            products: ProductService::new(db.clone()),
            customers: CustomerService::new(db.clone()),
            db,
        }
    }
}

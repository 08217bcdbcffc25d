//! Entity ↔ API model conversion

use shared::models as dto;

use crate::db::models::{Customer, CustomerDraft, Order, OrderItem, Product, ProductDraft};
use crate::orders::money;

pub fn customer_to_dto(customer: Customer) -> dto::Customer {
    dto::Customer {
        id: customer.id,
        name: customer.name,
        tax_id: customer.tax_id,
        phone: customer.phone,
        address: customer.address,
        is_final_consumer: customer.is_final_consumer,
    }
}

pub fn customer_draft(data: dto::CustomerCreate) -> CustomerDraft {
    CustomerDraft {
        name: data.name.trim().to_string(),
        tax_id: Some(data.tax_id.trim().to_string()),
        phone: data.phone,
        address: data.address,
        is_final_consumer: data.is_final_consumer.unwrap_or(false),
    }
}

/// Apply a partial update onto a loaded row
pub fn apply_customer_update(customer: &mut Customer, data: dto::CustomerUpdate) {
    if let Some(name) = data.name {
        customer.name = name.trim().to_string();
    }
    if let Some(tax_id) = data.tax_id {
        customer.tax_id = Some(tax_id.trim().to_string());
    }
    if data.phone.is_some() {
        customer.phone = data.phone;
    }
    if data.address.is_some() {
        customer.address = data.address;
    }
    if let Some(flag) = data.is_final_consumer {
        customer.is_final_consumer = flag;
    }
}

pub fn product_to_dto(product: Product) -> dto::Product {
    dto::Product {
        id: product.id,
        code: product.code,
        name: product.name,
        sale_price: product.sale_price,
        stock: product.stock,
        has_tax: product.has_tax,
    }
}

pub fn product_draft(data: dto::ProductCreate) -> ProductDraft {
    ProductDraft {
        code: data.code.trim().to_string(),
        name: data.name.trim().to_string(),
        sale_price: data.sale_price,
        stock: data.stock,
        has_tax: data.has_tax,
    }
}

pub fn apply_product_update(product: &mut Product, data: dto::ProductUpdate) {
    if let Some(code) = data.code {
        product.code = code.trim().to_string();
    }
    if let Some(name) = data.name {
        product.name = name.trim().to_string();
    }
    if let Some(price) = data.sale_price {
        product.sale_price = price;
    }
    if let Some(stock) = data.stock {
        product.stock = stock;
    }
    if data.has_tax.is_some() {
        product.has_tax = data.has_tax;
    }
}

pub fn order_item_to_dto(item: OrderItem) -> dto::OrderItem {
    // stored lines passed compute_totals, so the amount is in range
    let line_subtotal = money::line_subtotal(item.quantity, item.unit_price, item.discount)
        .unwrap_or_default();
    dto::OrderItem {
        id: item.id,
        product_id: item.product_id,
        product_code: item.product_code,
        product_name: item.product_name,
        quantity: item.quantity,
        unit_price: item.unit_price,
        discount: item.discount,
        has_tax: item.has_tax,
        line_subtotal,
        line_tax: money::round_money(money::line_tax(line_subtotal, item.has_tax)),
    }
}

pub fn order_to_dto(order: Order) -> dto::Order {
    dto::Order {
        id: order.id,
        customer_id: order.customer_id,
        payment_method: order.payment_method,
        status: order.status,
        subtotal: order.subtotal,
        tax: order.tax,
        discount: order.discount,
        total: order.total,
        items: order.items.into_iter().map(order_item_to_dto).collect(),
        created_at: order.created_at,
        updated_at: order.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::OrderStatus;

    #[test]
    fn test_order_item_derived_amounts() {
        let item = OrderItem {
            id: 1,
            product_id: 2,
            product_code: Some("P2".into()),
            product_name: Some("Water".into()),
            quantity: 1,
            unit_price: Decimal::new(500, 2),
            discount: Decimal::new(100, 2),
            has_tax: true,
        };

        let dto = order_item_to_dto(item);
        assert_eq!(dto.line_subtotal, Decimal::new(400, 2));
        assert_eq!(dto.line_tax, Decimal::new(60, 2));
    }

    #[test]
    fn test_order_to_dto_keeps_status_and_items() {
        let order = Order {
            id: 5,
            customer_id: 1,
            payment_method: "CASH".into(),
            status: OrderStatus::Processing,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            items: vec![],
            created_at: 1,
            updated_at: 2,
        };

        let dto = order_to_dto(order);
        assert_eq!(dto.id, 5);
        assert_eq!(dto.status, OrderStatus::Processing);
        assert!(dto.items.is_empty());
    }

    #[test]
    fn test_apply_product_update_is_partial() {
        let mut product = Product {
            id: 1,
            code: "A".into(),
            name: "Old".into(),
            sale_price: Decimal::ONE,
            stock: 4,
            has_tax: Some(true),
        };

        apply_product_update(
            &mut product,
            dto::ProductUpdate {
                name: Some(" New ".into()),
                ..Default::default()
            },
        );

        assert_eq!(product.name, "New");
        assert_eq!(product.stock, 4);
        assert_eq!(product.has_tax, Some(true));
    }
}

//! Money calculation using rust_decimal
//!
//! Line amounts are kept exact; order subtotal and tax are rounded to
//! cents after summation and the total is derived from the rounded values.

use rust_decimal::prelude::*;

use crate::db::models::OrderItemDraft;

/// Rounding precision for stored amounts
const DECIMAL_PLACES: u32 = 2;

/// VAT applied to taxable lines (15%)
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Largest amount a NUMERIC(18, 2) column holds: 9999999999999999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_671, 232_830_643, 0, false, 2);

/// Round to cents, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `value` carries no digits below the cent
pub fn is_cent_precise(value: Decimal) -> bool {
    value.normalize().scale() <= DECIMAL_PLACES
}

/// True when `value` fits the stored amount columns
pub fn in_amount_range(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT
}

/// quantity × unit_price, `None` on overflow
pub fn line_gross(quantity: i32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price)
}

/// quantity × unit_price − discount, `None` on overflow
pub fn line_subtotal(quantity: i32, unit_price: Decimal, discount: Decimal) -> Option<Decimal> {
    line_gross(quantity, unit_price)?.checked_sub(discount)
}

pub fn line_tax(subtotal: Decimal, has_tax: bool) -> Decimal {
    if has_tax {
        subtotal * TAX_RATE
    } else {
        Decimal::ZERO
    }
}

/// Order-level amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Sum the lines and apply the order discount.
///
/// Returns `None` when an intermediate sum overflows or a resulting
/// amount does not fit the stored columns.
pub fn compute_totals(items: &[OrderItemDraft], order_discount: Decimal) -> Option<Totals> {
    let mut subtotal = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    for item in items {
        let line = line_subtotal(item.quantity, item.unit_price, item.discount)?;
        subtotal = subtotal.checked_add(line)?;
        tax = tax.checked_add(line_tax(line, item.has_tax))?;
    }
    let subtotal = round_money(subtotal);
    let tax = round_money(tax);
    let total = subtotal.checked_add(tax)?.checked_sub(order_discount)?;

    [subtotal, tax, order_discount, total]
        .into_iter()
        .all(in_amount_range)
        .then_some(Totals {
            subtotal,
            tax,
            discount: order_discount,
            total,
        })
}

#[cfg(test)]
mod tests;

use super::*;

fn item(quantity: i32, unit_price: Decimal, discount: Decimal, has_tax: bool) -> OrderItemDraft {
    OrderItemDraft {
        product_id: 1,
        quantity,
        unit_price,
        discount,
        has_tax,
    }
}

#[test]
fn test_tax_rate_is_fifteen_percent() {
    assert_eq!(TAX_RATE, Decimal::new(15, 2));
}

#[test]
fn test_line_subtotal_subtracts_discount() {
    assert_eq!(
        line_subtotal(3, Decimal::new(1099, 2), Decimal::new(50, 2)),
        Some(Decimal::new(3247, 2))
    );
}

#[test]
fn test_line_tax_only_when_flagged() {
    let subtotal = Decimal::new(400, 2);
    assert_eq!(line_tax(subtotal, true), Decimal::new(60, 2));
    assert_eq!(line_tax(subtotal, false), Decimal::ZERO);
}

#[test]
fn test_compute_totals_reference_order() {
    let items = vec![
        item(2, Decimal::new(1000, 2), Decimal::ZERO, false),
        item(1, Decimal::new(500, 2), Decimal::new(100, 2), true),
    ];

    let totals = compute_totals(&items, Decimal::ZERO).unwrap();

    assert_eq!(totals.subtotal, Decimal::new(2400, 2));
    assert_eq!(totals.tax, Decimal::new(60, 2));
    assert_eq!(totals.total, Decimal::new(2460, 2));
}

#[test]
fn test_order_discount_reduces_total_only() {
    let items = vec![item(1, Decimal::new(1000, 2), Decimal::ZERO, true)];

    let totals = compute_totals(&items, Decimal::new(200, 2)).unwrap();

    assert_eq!(totals.subtotal, Decimal::new(1000, 2));
    assert_eq!(totals.tax, Decimal::new(150, 2));
    assert_eq!(totals.discount, Decimal::new(200, 2));
    assert_eq!(totals.total, Decimal::new(950, 2));
}

#[test]
fn test_tax_rounded_after_summation() {
    // 3 lines of 0.10 taxed: 0.015 each, 0.045 summed, 0.05 rounded
    let items = vec![
        item(1, Decimal::new(10, 2), Decimal::ZERO, true),
        item(1, Decimal::new(10, 2), Decimal::ZERO, true),
        item(1, Decimal::new(10, 2), Decimal::ZERO, true),
    ];

    let totals = compute_totals(&items, Decimal::ZERO).unwrap();

    assert_eq!(totals.tax, Decimal::new(5, 2));
    assert_eq!(totals.total, Decimal::new(35, 2));
}

#[test]
fn test_round_money_midpoint_away_from_zero() {
    assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
    assert_eq!(round_money(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
    assert_eq!(round_money(Decimal::new(1004, 3)), Decimal::new(100, 2));
}

#[test]
fn test_empty_order_is_zero() {
    let totals = compute_totals(&[], Decimal::ZERO).unwrap();
    assert_eq!(totals.total, Decimal::ZERO);
}

#[test]
fn test_line_amounts_overflow_to_none() {
    assert_eq!(line_gross(2, Decimal::MAX), None);
    assert_eq!(line_subtotal(1, Decimal::ONE, Decimal::MIN), None);
}

#[test]
fn test_compute_totals_rejects_overflowing_sum() {
    let items = vec![
        item(1, Decimal::MAX, Decimal::ZERO, false),
        item(1, Decimal::MAX, Decimal::ZERO, false),
    ];
    assert_eq!(compute_totals(&items, Decimal::ZERO), None);
}

#[test]
fn test_compute_totals_rejects_amounts_beyond_column_range() {
    let items = vec![item(1, MAX_AMOUNT, Decimal::ZERO, true)];
    // tax on top of the largest subtotal no longer fits
    assert_eq!(compute_totals(&items, Decimal::ZERO), None);

    let items = vec![item(1, Decimal::new(100, 2), Decimal::ZERO, false)];
    assert_eq!(compute_totals(&items, Decimal::MAX), None);
}

#[test]
fn test_cent_precision() {
    assert!(is_cent_precise(Decimal::new(1050, 2)));
    assert!(is_cent_precise(Decimal::new(5000, 4)));
    assert!(!is_cent_precise(Decimal::new(5, 3)));
}

#[test]
fn test_max_amount_matches_column() {
    assert_eq!(MAX_AMOUNT.to_string(), "9999999999999999.99");
    assert!(in_amount_range(MAX_AMOUNT));
    assert!(!in_amount_range(MAX_AMOUNT + Decimal::new(1, 2)));
}

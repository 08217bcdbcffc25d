//! Order detail report
//!
//! Builds the printable view of one order and renders it as fixed-width
//! text, one product per block, totals at the bottom.

use rust_decimal::Decimal;
use shared::models::{self as dto, OrderReport, OrderReportLine};

use crate::db::models::Customer;

/// Assemble the report from an order and its customer.
///
/// A line whose product row no longer exists prints the product id as
/// its code and an empty name.
pub fn build_report(order: dto::Order, customer: Option<Customer>) -> OrderReport {
    let (customer_name, customer_tax_id) = match customer {
        Some(c) => (c.name, c.tax_id),
        None => (String::new(), None),
    };

    OrderReport {
        order_id: order.id,
        customer_id: order.customer_id,
        customer_name,
        customer_tax_id,
        status: order.status,
        payment_method: order.payment_method,
        created_at: order.created_at,
        lines: order
            .items
            .into_iter()
            .map(|item| OrderReportLine {
                product_code: item
                    .product_code
                    .unwrap_or_else(|| item.product_id.to_string()),
                product_name: item.product_name.unwrap_or_default(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                discount: item.discount,
                line_subtotal: item.line_subtotal,
                line_tax: item.line_tax,
            })
            .collect(),
        subtotal: order.subtotal,
        tax: order.tax,
        discount: order.discount,
        total: order.total,
    }
}

/// Plain-text renderer for [`OrderReport`]
///
/// Common widths:
/// - 58mm paper: 32 characters
/// - 80mm paper: 48 characters
pub struct OrderReportRenderer {
    width: usize,
}

impl OrderReportRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn render(&self, report: &OrderReport) -> String {
        let mut out = String::new();

        self.render_header(&mut out, report);
        for line in &report.lines {
            self.render_line(&mut out, line);
        }
        self.render_totals(&mut out, report);

        out
    }

    fn render_header(&self, out: &mut String, report: &OrderReport) {
        self.sep(out, '=');
        self.centered(out, &format!("ORDER #{}", report.order_id));
        self.centered(out, &format_timestamp(report.created_at));
        self.sep(out, '=');

        let customer = match &report.customer_tax_id {
            Some(tax_id) => format!("{} ({tax_id})", report.customer_name),
            None => report.customer_name.clone(),
        };
        push_line(out, &format!("Customer: {customer}"));
        push_line(out, &format!("Payment:  {}", report.payment_method));
        push_line(out, &format!("Status:   {}", report.status));
        self.sep(out, '-');
    }

    /// `CODE Name` then `  qty x price [-discount]   amount`
    fn render_line(&self, out: &mut String, line: &OrderReportLine) {
        push_line(out, &format!("{} {}", line.product_code, line.product_name));

        let mut detail = format!("  {} x {}", line.quantity, money(line.unit_price));
        if !line.discount.is_zero() {
            detail.push_str(&format!(" -{}", money(line.discount)));
        }
        if !line.line_tax.is_zero() {
            detail.push_str(" T");
        }
        self.columns(out, &detail, &money(line.line_subtotal));
    }

    fn render_totals(&self, out: &mut String, report: &OrderReport) {
        self.sep(out, '-');
        self.columns(out, "Subtotal", &money(report.subtotal));
        self.columns(out, "Tax", &money(report.tax));
        if !report.discount.is_zero() {
            self.columns(out, "Discount", &format!("-{}", money(report.discount)));
        }
        self.columns(out, "TOTAL", &money(report.total));
        self.sep(out, '=');
    }

    fn sep(&self, out: &mut String, ch: char) {
        push_line(out, &ch.to_string().repeat(self.width));
    }

    fn centered(&self, out: &mut String, text: &str) {
        let pad = self.width.saturating_sub(text.chars().count()) / 2;
        push_line(out, &format!("{}{text}", " ".repeat(pad)));
    }

    /// Left text and right-aligned value on one row, at least one space apart
    fn columns(&self, out: &mut String, left: &str, right: &str) {
        let used = left.chars().count() + right.chars().count();
        let gap = self.width.saturating_sub(used).max(1);
        push_line(out, &format!("{left}{}{right}", " ".repeat(gap)));
    }
}

impl Default for OrderReportRenderer {
    fn default() -> Self {
        Self::new(48)
    }
}

fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

/// Two decimals, always
fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn format_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(ts) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown time".to_string(),
    }
}

//! Text rendering of validated rows and RFM summaries for the terminal

use crate::data::PurchaseOrder;
use crate::rfm::RfmSummary;
use std::fmt::Write;

const DESCRIPTION_WIDTH: usize = 40;

/// Render a preview table of validated rows, at most `limit` of them.
///
/// Each row carries its stable synthetic id (the position in the validated
/// sequence).
pub fn render_table<'a>(
    rows: impl Iterator<Item = (usize, &'a PurchaseOrder)>,
    limit: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<10}  {:<12}  {:>12}  {:<30}  {}",
        "ID", "PO Date", "PO Number", "PO Amount", "Supplier", "Description"
    );

    let mut shown = 0usize;
    let mut total = 0usize;
    for (id, order) in rows {
        total += 1;
        if shown >= limit {
            continue;
        }
        let _ = writeln!(
            out,
            "{:>5}  {:<10}  {:<12}  {:>12}  {:<30}  {}",
            id,
            order.po_date.format("%Y-%m-%d"),
            order.po_number.as_deref().unwrap_or("-"),
            format_currency(order.amount),
            truncate(&order.supplier_name, 30),
            truncate(order.description.as_deref().unwrap_or(""), DESCRIPTION_WIDTH),
        );
        shown += 1;
    }
    if total > shown {
        let _ = writeln!(out, "  ... {} more rows", total - shown);
    }
    out
}

/// Render the RFM summary card block for one supplier
pub fn render_summary(supplier: &str, summary: &RfmSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== RFM Analysis for {supplier} ===");
    let _ = writeln!(
        out,
        "Recency:   {} days since last purchase order",
        summary.recency_days
    );
    let _ = writeln!(
        out,
        "Frequency: {:.2} orders per month",
        summary.frequency_per_month
    );
    let _ = writeln!(
        out,
        "Monetary:  {} total, {} average order value",
        format_currency(summary.monetary.total),
        format_currency(summary.monetary.average)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Order History:");
    let _ = writeln!(out, "  First Order:  {}", summary.first_order_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "  Last Order:   {}", summary.last_order_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "  Total Orders: {}", summary.order_count);
    out
}

/// Format a dollar amount with thousands separators, e.g. `$1,234.50`
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{frac:02}")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

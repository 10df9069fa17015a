//! RFM metric aggregation over validated purchase orders

use crate::data::{PurchaseOrder, ALL_SUPPLIERS};
use chrono::NaiveDate;
use serde::Serialize;

/// Average month length in days used for the frequency span
const DAYS_PER_MONTH: f64 = 30.44;

/// Monetary slice of an RFM summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monetary {
    pub total: f64,
    pub average: f64,
}

/// Per-supplier Recency/Frequency/Monetary summary
///
/// Derived and ephemeral: recomputed from scratch on every dataset or
/// selection change, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmSummary {
    /// Days between the reference date and the most recent order; negative
    /// when the last order is future-dated (passed through, not special-cased)
    pub recency_days: i64,
    /// Orders per month over the first-to-last order span, rounded to two
    /// decimal places
    pub frequency_per_month: f64,
    pub monetary: Monetary,
    pub order_count: usize,
    pub first_order_date: NaiveDate,
    pub last_order_date: NaiveDate,
}

/// Compute the RFM summary for one supplier
///
/// Returns `None` when no supplier is selected (the "all" sentinel or an
/// empty name), when the dataset is empty, when no orders match, or when the
/// computation cannot produce finite metrics. Pure function: identical inputs
/// always yield identical output.
pub fn compute_rfm(
    records: &[PurchaseOrder],
    supplier: &str,
    as_of: NaiveDate,
) -> Option<RfmSummary> {
    if supplier.is_empty() || supplier == ALL_SUPPLIERS || records.is_empty() {
        return None;
    }

    let orders: Vec<&PurchaseOrder> = records
        .iter()
        .filter(|r| r.supplier_name == supplier)
        .collect();
    if orders.is_empty() {
        return None;
    }

    let first_order_date = orders.iter().map(|o| o.po_date).min()?;
    let last_order_date = orders.iter().map(|o| o.po_date).max()?;

    let recency_days = (as_of - last_order_date).num_days();

    let span_days = (last_order_date - first_order_date).num_days() as f64;
    let span_months = span_days / DAYS_PER_MONTH;
    // Single order or all orders on the same day: floor the divisor at one
    // month-equivalent instead of dividing by zero.
    let divisor = if span_months == 0.0 { 1.0 } else { span_months };
    let frequency_per_month = round2(orders.len() as f64 / divisor);

    let total: f64 = orders.iter().map(|o| o.amount).sum();
    let average = total / orders.len() as f64;

    // A garbage summary is worse than none at all
    if !frequency_per_month.is_finite() || !total.is_finite() || !average.is_finite() {
        return None;
    }

    Some(RfmSummary {
        recency_days,
        frequency_per_month,
        monetary: Monetary { total, average },
        order_count: orders.len(),
        first_order_date,
        last_order_date,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Purchase-order ingestion: CSV loading, per-record validation, supplier listing

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Read;

/// Sentinel supplier name representing "no filter"
pub const ALL_SUPPLIERS: &str = "all";

/// Column names expected in the source CSV
pub const COL_SUPPLIER: &str = "SUPPLIER_NAME";
pub const COL_DATE: &str = "PO_DATE";
pub const COL_NUMBER: &str = "PO_NUMBER";
pub const COL_AMOUNT: &str = "PO_AMOUNT";
pub const COL_DESCRIPTION: &str = "ITEM_DESCRIPTION";

/// One raw data row: an untyped mapping from column header to dynamically
/// typed cell value. No invariants are guaranteed at this stage.
pub type RawRecord = Map<String, Value>;

/// A purchase-order row that has passed structural and type checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrder {
    pub supplier_name: String,
    pub po_date: NaiveDate,
    /// Document identifier, carried for display only
    pub po_number: Option<String>,
    pub amount: f64,
    pub description: Option<String>,
}

/// Load raw purchase-order rows from CSV data
///
/// Cells are dynamically typed the way the source feed is: an empty cell
/// becomes null, a numeric-looking cell becomes a number, anything else stays
/// a string. A malformed file fails the whole load; per-row problems are left
/// for [`validate`] to sort out.
pub fn load_raw_records<R: Read>(reader: R) -> crate::Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut record = RawRecord::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            record.insert(header.to_string(), type_cell(cell));
        }
        records.push(record);
    }

    tracing::info!(rows = records.len(), "raw records loaded");
    Ok(records)
}

/// Load raw purchase-order rows from a CSV file path
pub fn load_raw_records_from_path(path: &str) -> crate::Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open input file: {path}"))?;
    load_raw_records(file)
}

fn type_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(parsed) = cell.parse::<i64>() {
        return Value::Number(parsed.into());
    }
    if let Ok(parsed) = cell.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(parsed) {
            return Value::Number(number);
        }
    }
    Value::String(cell.to_string())
}

/// Validate raw rows into typed purchase orders
///
/// Each row is checked independently; output order matches input order. A row
/// missing its supplier name, date, or amount, or carrying an unparseable
/// date or amount, is dropped entirely. Rejections are not errors, only
/// omissions; each one is logged at debug level.
pub fn validate(raw_records: &[RawRecord]) -> Vec<PurchaseOrder> {
    raw_records.iter().filter_map(validate_record).collect()
}

fn validate_record(raw: &RawRecord) -> Option<PurchaseOrder> {
    let Some(supplier_name) = non_empty_text(raw.get(COL_SUPPLIER)) else {
        tracing::debug!("skipping row with missing supplier name");
        return None;
    };
    let Some(date_value) = raw.get(COL_DATE).filter(|v| !v.is_null()) else {
        tracing::debug!(supplier = %supplier_name, "skipping row with missing date");
        return None;
    };
    let Some(po_date) = parse_date_value(date_value) else {
        tracing::debug!(supplier = %supplier_name, date = %date_value, "skipping row with invalid date");
        return None;
    };
    let Some(amount_value) = raw.get(COL_AMOUNT).filter(|v| !v.is_null()) else {
        tracing::debug!(supplier = %supplier_name, "skipping row with missing amount");
        return None;
    };
    let Some(amount) = parse_amount(amount_value) else {
        tracing::debug!(supplier = %supplier_name, amount = %amount_value, "skipping row with invalid amount");
        return None;
    };

    Some(PurchaseOrder {
        supplier_name,
        po_date,
        po_number: non_empty_text(raw.get(COL_NUMBER)),
        amount,
        description: non_empty_text(raw.get(COL_DESCRIPTION)),
    })
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    None
}

/// Parse an amount cell into a finite decimal
///
/// Numbers pass through. Strings tolerate a leading dollar sign and
/// thousands-separator commas, so `"$1,234.50"` parses to `1234.50`.
fn parse_amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned = s.trim().trim_start_matches('$').trim().replace(',', "");
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// List distinct supplier names, sorted ascending, with the "all" sentinel
/// prepended to represent "no filter"
pub fn list_suppliers(records: &[PurchaseOrder]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.supplier_name.clone()).collect();
    names.sort();
    names.dedup();

    let mut result = Vec::with_capacity(names.len() + 1);
    result.push(ALL_SUPPLIERS.to_string());
    result.extend(names);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn raw_row(supplier: Value, date: Value, amount: Value) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert(COL_SUPPLIER.to_string(), supplier);
        record.insert(COL_DATE.to_string(), date);
        record.insert(COL_AMOUNT.to_string(), amount);
        record.insert(COL_NUMBER.to_string(), json!("PO-1001"));
        record.insert(COL_DESCRIPTION.to_string(), json!("OFFICE SUPPLIES"));
        record
    }

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "SUPPLIER_NAME,PO_DATE,PO_NUMBER,PO_AMOUNT,ITEM_DESCRIPTION"
        )
        .unwrap();
        writeln!(file, "ACME CORP,2024-03-01,PO-1001,100,PAPER").unwrap();
        writeln!(file, "ACME CORP,2024-03-05,PO-1002,250.50,TONER").unwrap();
        writeln!(file, ",2024-03-06,PO-1003,75,MISSING SUPPLIER").unwrap();
        writeln!(file, "BOLT LLC,not-a-date,PO-1004,75,BAD DATE").unwrap();
        writeln!(file, "BOLT LLC,2024-02-10,PO-1005,,MISSING AMOUNT").unwrap();
        writeln!(file, "BOLT LLC,2024-02-12,PO-1006,42.00,HARDWARE").unwrap();
        file
    }

    #[test]
    fn test_load_and_validate_csv() {
        let file = create_test_csv();
        let raw = load_raw_records_from_path(file.path().to_str().unwrap()).unwrap();
        assert_eq!(raw.len(), 6);

        // Dynamic typing: numeric cells become numbers, blanks become null
        assert_eq!(raw[0].get(COL_AMOUNT), Some(&json!(100)));
        assert!(raw[4].get(COL_AMOUNT).unwrap().is_null());

        let orders = validate(&raw);
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].supplier_name, "ACME CORP");
        assert_eq!(orders[2].supplier_name, "BOLT LLC");
        assert_eq!(orders[2].amount, 42.0);
    }

    #[test]
    fn test_validate_rejects_incomplete_rows() {
        let rows = vec![
            raw_row(json!("ACME"), json!("2024-01-01"), json!(10.0)),
            raw_row(Value::Null, json!("2024-01-02"), json!(10.0)),
            raw_row(json!("ACME"), Value::Null, json!(10.0)),
            raw_row(json!("ACME"), json!("2024-01-04"), Value::Null),
            raw_row(json!("  "), json!("2024-01-05"), json!(10.0)),
            raw_row(json!("ZETA"), json!("2024-01-06"), json!(20.0)),
        ];

        let orders = validate(&rows);
        assert_eq!(orders.len(), 2);
        // Relative order is preserved
        assert_eq!(orders[0].supplier_name, "ACME");
        assert_eq!(orders[1].supplier_name, "ZETA");
    }

    #[test]
    fn test_validate_rejects_unparseable_fields() {
        let rows = vec![
            raw_row(json!("ACME"), json!("13/45/2024"), json!(10.0)),
            raw_row(json!("ACME"), json!("2024-01-01"), json!("ten dollars")),
        ];
        assert!(validate(&rows).is_empty());
    }

    #[test]
    fn test_date_format_tolerance() {
        let formats = [
            "2024-03-01",
            "03/01/2024",
            "2024-03-01T08:26:00",
            "2024-03-01 08:26:00",
            "2024-03-01T08:26:00Z",
        ];
        for text in formats {
            let rows = vec![raw_row(json!("ACME"), json!(text), json!(10.0))];
            let orders = validate(&rows);
            assert_eq!(orders.len(), 1, "date {text} should parse");
            assert_eq!(
                orders[0].po_date,
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
            );
        }
    }

    #[test]
    fn test_amount_parse_tolerance() {
        // Locale-formatted amounts are accepted; this pins the policy
        let rows = vec![
            raw_row(json!("ACME"), json!("2024-01-01"), json!("1,234.50")),
            raw_row(json!("ACME"), json!("2024-01-02"), json!("$2,500")),
            raw_row(json!("ACME"), json!("2024-01-03"), json!("abc")),
        ];

        let orders = validate(&rows);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].amount, 1234.50);
        assert_eq!(orders[1].amount, 2500.0);
    }

    #[test]
    fn test_list_suppliers_sorted_with_sentinel() {
        let rows = vec![
            raw_row(json!("ZETA"), json!("2024-01-01"), json!(10.0)),
            raw_row(json!("ACME"), json!("2024-01-02"), json!(10.0)),
            raw_row(json!("ZETA"), json!("2024-01-03"), json!(10.0)),
            raw_row(json!("MIDWAY"), json!("2024-01-04"), json!(10.0)),
        ];
        let orders = validate(&rows);

        let suppliers = list_suppliers(&orders);
        assert_eq!(suppliers, vec!["all", "ACME", "MIDWAY", "ZETA"]);
    }

    #[test]
    fn test_list_suppliers_empty_dataset() {
        assert_eq!(list_suppliers(&[]), vec!["all"]);
    }
}

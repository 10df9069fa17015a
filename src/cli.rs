//! Command-line interface definitions and argument parsing

use chrono::NaiveDate;
use clap::Parser;

/// Supplier RFM analysis over purchase-order CSV data
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "purchase_orders.csv")]
    pub input: String,

    /// Supplier to analyze; omit or pass "all" to list suppliers instead
    #[arg(short, long)]
    pub supplier: Option<String>,

    /// Reference date for recency in YYYY-MM-DD format (default: today)
    #[arg(long)]
    pub as_of: Option<String>,

    /// Maximum number of rows in the data preview table
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Emit the RFM summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the recency reference date, defaulting to today
    pub fn as_of_date(&self) -> crate::Result<NaiveDate> {
        match &self.as_of {
            Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
                anyhow::anyhow!("Invalid --as-of date: {} (expected YYYY-MM-DD)", text)
            }),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }
}

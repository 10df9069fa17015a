//! RFMScope: A Rust CLI application for supplier behavior analysis
//!
//! This library provides functionality for RFM (Recency, Frequency, Monetary)
//! analysis on purchase-order data: CSV ingestion, per-record validation, and
//! per-supplier metric aggregation.

pub mod cli;
pub mod data;
pub mod report;
pub mod rfm;
pub mod session;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{
    list_suppliers, load_raw_records, load_raw_records_from_path, validate, PurchaseOrder,
    RawRecord, ALL_SUPPLIERS,
};
pub use rfm::{compute_rfm, Monetary, RfmSummary};
pub use session::Session;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;

//! Mutable application state around the pure validation/aggregation core

use crate::data::{self, PurchaseOrder, RawRecord, ALL_SUPPLIERS};
use crate::rfm::{self, RfmSummary};
use chrono::NaiveDate;

/// Controller owning the loaded dataset and the current supplier selection.
///
/// Two triggers recompute derived state from scratch: dataset replacement and
/// selection change. The core functions stay pure; all mutation lives here.
///
/// Loads are tagged with a generation token. A completion presenting a stale
/// token (superseded by a newer `begin_load`) is dropped outright, so
/// overlapping loads resolve last-write-wins.
pub struct Session {
    records: Vec<PurchaseOrder>,
    suppliers: Vec<String>,
    selected: String,
    summary: Option<RfmSummary>,
    as_of: NaiveDate,
    loading: bool,
    generation: u64,
}

impl Session {
    /// Create an empty session; `as_of` is the reference date for recency
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            records: Vec::new(),
            suppliers: vec![ALL_SUPPLIERS.to_string()],
            selected: ALL_SUPPLIERS.to_string(),
            summary: None,
            as_of,
            loading: false,
            generation: 0,
        }
    }

    /// Enter the loading state and return the generation token the matching
    /// [`finish_load`](Session::finish_load) call must present
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Apply a load outcome
    ///
    /// A successful load replaces the dataset wholesale and revalidates it; a
    /// failed load leaves the dataset empty. Either way the loading state
    /// ends and derived state is recomputed. Stale tokens are ignored.
    pub fn finish_load(&mut self, token: u64, outcome: crate::Result<Vec<RawRecord>>) {
        if token != self.generation {
            tracing::debug!(token, current = self.generation, "dropping stale load result");
            return;
        }
        self.loading = false;

        match outcome {
            Ok(raw) => {
                self.records = data::validate(&raw);
                tracing::info!(
                    raw = raw.len(),
                    valid = self.records.len(),
                    "dataset replaced"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "load failed, dataset left empty");
                self.records = Vec::new();
            }
        }

        self.suppliers = data::list_suppliers(&self.records);
        self.recompute();
    }

    /// Change the selected supplier and recompute the summary
    pub fn select_supplier(&mut self, name: &str) {
        self.selected = name.to_string();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.summary = rfm::compute_rfm(&self.records, &self.selected, self.as_of);
    }

    pub fn records(&self) -> &[PurchaseOrder] {
        &self.records
    }

    /// Validated rows paired with a stable synthetic row id (their position)
    pub fn rows(&self) -> impl Iterator<Item = (usize, &PurchaseOrder)> {
        self.records.iter().enumerate()
    }

    pub fn suppliers(&self) -> &[String] {
        &self.suppliers
    }

    pub fn selected_supplier(&self) -> &str {
        &self.selected
    }

    pub fn summary(&self) -> Option<&RfmSummary> {
        self.summary.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

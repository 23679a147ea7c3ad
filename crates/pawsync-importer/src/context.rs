//! Per-batch accumulation state.

use std::collections::HashSet;

use pawsync_core::WriteOp;

/// Everything one batch invocation accumulates while walking its page.
///
/// Passed explicitly into each pipeline step and merged back, so the steps
/// stay pure enough to test in isolation — no state captured by closure.
#[derive(Debug, Default)]
pub struct BatchContext {
    /// Ordered, human-readable log lines returned to the caller.
    pub logs: Vec<String>,
    /// Write ops for the single end-of-page commit.
    pub ops: Vec<WriteOp>,
    /// Rows that made it through the full pipeline.
    pub processed: u32,
    /// Suppliers already ensured during this batch, to skip repeat inserts.
    ensured_suppliers: HashSet<String>,
}

impl BatchContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a log line for the caller-facing report.
    pub fn log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    /// Returns `true` the first time a supplier id is seen in this batch.
    pub fn mark_supplier(&mut self, supplier_id: &str) -> bool {
        self.ensured_suppliers.insert(supplier_id.to_owned())
    }

    #[must_use]
    pub fn supplier_seen(&self, supplier_id: &str) -> bool {
        self.ensured_suppliers.contains(supplier_id)
    }
}

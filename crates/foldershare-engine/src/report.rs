//! Partial-failure reporting for bulk tree operations.

use foldershare_core::error::{AppError, ItemFailure, MultiError};
use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;

/// Outcome of a bulk operation that finishes as much work as it can.
///
/// Pre-flight problems (bad destination, cycle, lock on the primary item)
/// are ordinary errors; once work starts, per-item failures land here, in
/// deterministic processing order, and the operation keeps going. Callers
/// that want all-or-error semantics use [`into_result`](Self::into_result).
#[derive(Debug)]
pub struct BulkReport<T> {
    /// The operation's result value.
    pub value: T,
    /// How many items the operation attempted to process.
    pub attempted: usize,
    /// One entry per item that could not be processed.
    pub failures: Vec<ItemFailure>,
}

impl<T> BulkReport<T> {
    /// A report with no work recorded yet.
    pub fn new(value: T) -> Self {
        Self {
            value,
            attempted: 0,
            failures: Vec::new(),
        }
    }

    /// Record one attempted item.
    pub fn attempt(&mut self) {
        self.attempted += 1;
    }

    /// Record a failed item.
    pub fn fail(&mut self, item_id: ItemId, name: impl Into<String>, error: AppError) {
        self.failures.push(ItemFailure {
            item_id,
            name: name.into(),
            error,
        });
    }

    /// Whether every attempted item succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Collapse into a plain result: the value on full success, an
    /// aggregate error enumerating the failed items otherwise.
    pub fn into_result(self) -> AppResult<T> {
        if self.failures.is_empty() {
            Ok(self.value)
        } else {
            Err(MultiError::new(self.attempted, self.failures).into())
        }
    }

    /// Map the report's value, keeping the failure bookkeeping.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BulkReport<U> {
        BulkReport {
            value: f(self.value),
            attempted: self.attempted,
            failures: self.failures,
        }
    }

    /// Fold another report's bookkeeping into this one.
    pub fn absorb<U>(&mut self, other: BulkReport<U>) -> U {
        self.attempted += other.attempted;
        self.failures.extend(other.failures);
        other.value
    }
}

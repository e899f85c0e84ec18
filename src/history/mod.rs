//! Calculation history: append-only record list with change listeners.
//!
//! The [`HistoryStore`] owns every [`CalculationRecord`] for the session.
//! Listeners registered with [`HistoryStore::subscribe`] are called
//! synchronously, in registration order, after each append.

pub mod file;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;
use crate::operations::{Operation, format_number};

// ── Record ───────────────────────────────────────────────────────────────────

/// One evaluated calculation. Fields are private; records are never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    operation: Operation,
    operand1: f64,
    operand2: f64,
    result: f64,
}

impl CalculationRecord {
    pub fn new(operation: Operation, operand1: f64, operand2: f64, result: f64) -> Self {
        Self { operation, operand1, operand2, result }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operand1(&self) -> f64 {
        self.operand1
    }

    pub fn operand2(&self) -> f64 {
        self.operand2
    }

    pub fn result(&self) -> f64 {
        self.result
    }
}

impl fmt::Display for CalculationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            format_number(self.operand1),
            self.operation,
            format_number(self.operand2),
            format_number(self.result)
        )
    }
}

// ── Listeners ────────────────────────────────────────────────────────────────

/// Notified after each record is appended.
///
/// An error returned from `notify` propagates out of
/// [`HistoryStore::append`]; later listeners are skipped for that record.
pub trait HistoryListener {
    fn notify(&self, record: &CalculationRecord) -> Result<(), AppError>;
}

/// Writes each new record to the diagnostic log.
#[derive(Debug, Default)]
pub struct LoggingListener;

impl HistoryListener for LoggingListener {
    fn notify(&self, record: &CalculationRecord) -> Result<(), AppError> {
        info!(calculation = %record, "new calculation added to history");
        Ok(())
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct HistoryStore {
    records: Vec<CalculationRecord>,
    listeners: Vec<Box<dyn HistoryListener>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners are invoked in registration order.
    pub fn subscribe(&mut self, listener: Box<dyn HistoryListener>) {
        self.listeners.push(listener);
        debug!(listeners = self.listeners.len(), "history listener added");
    }

    /// Append `record`, then notify every listener.
    ///
    /// The record is stored before any listener runs, so it remains in the
    /// history even when a listener fails.
    pub fn append(&mut self, record: CalculationRecord) -> Result<(), AppError> {
        self.records.push(record);
        let Some(stored) = self.records.last() else {
            return Ok(());
        };
        for listener in &self.listeners {
            listener.notify(stored)?;
        }
        debug!(len = self.records.len(), "record appended");
        Ok(())
    }

    /// Read-only view in insertion order.
    pub fn list(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&CalculationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record. Listeners are not notified.
    pub fn clear(&mut self) {
        let dropped = self.records.len();
        self.records.clear();
        info!(dropped, "history cleared");
    }

    /// Swap in `records` wholesale (used when loading from disk).
    pub fn replace(&mut self, records: Vec<CalculationRecord>) {
        self.records = records;
    }
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

//! The calculator: one explicitly owned history plus evaluation.
//!
//! Callers construct a `Calculator` and pass it by reference; there is no
//! process-wide instance.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AppError, CalcError};
use crate::history::{CalculationRecord, HistoryListener, HistoryStore, file};
use crate::operations::Operation;

#[derive(Debug, Default)]
pub struct Calculator {
    history: HistoryStore,
    history_file: Option<PathBuf>,
    autosave: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a history file. With `autosave`, every append and clear
    /// rewrites it.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>, autosave: bool) -> Self {
        self.history_file = Some(path.into());
        self.autosave = autosave;
        self
    }

    pub fn subscribe(&mut self, listener: Box<dyn HistoryListener>) {
        self.history.subscribe(listener);
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }

    /// Resolve `name`, apply it to `a` and `b`, and record the result.
    ///
    /// Unknown names and operand errors leave the history untouched.
    pub fn evaluate(
        &mut self,
        name: &str,
        a: f64,
        b: f64,
    ) -> Result<CalculationRecord, CalcError> {
        let op = Operation::lookup(name)
            .ok_or_else(|| CalcError::UnknownOperation(name.to_string()))?;
        self.perform(op, a, b)
    }

    /// Apply a resolved operation and record the result.
    pub fn perform(
        &mut self,
        op: Operation,
        a: f64,
        b: f64,
    ) -> Result<CalculationRecord, CalcError> {
        let result = op.apply(a, b)?;
        let record = CalculationRecord::new(op, a, b, result);
        self.history.append(record.clone())?;
        self.autosave()?;
        Ok(record)
    }

    pub fn clear(&mut self) -> Result<(), AppError> {
        self.history.clear();
        self.autosave()
    }

    /// Write the history to the configured file and return its path.
    pub fn save_history(&self) -> Result<&Path, AppError> {
        let path = self.require_history_file()?;
        file::save(path, self.history.list())?;
        Ok(path)
    }

    /// Replace the in-memory history with the file contents and return the
    /// number of records loaded. A missing file empties the history and
    /// returns `None`. On error the current history is kept.
    pub fn load_history(&mut self) -> Result<Option<usize>, AppError> {
        let loaded = file::load(self.require_history_file()?)?;
        let count = loaded.as_ref().map(Vec::len);
        self.history.replace(loaded.unwrap_or_default());
        Ok(count)
    }

    fn require_history_file(&self) -> Result<&Path, AppError> {
        self.history_file
            .as_deref()
            .ok_or_else(|| {
                AppError::History("no history file configured (set HISTORY_FILE)".into())
            })
    }

    fn autosave(&self) -> Result<(), AppError> {
        match (&self.history_file, self.autosave) {
            (Some(path), true) => {
                info!(path = %path.display(), "autosaving history");
                file::save(path, self.history.list())
            }
            _ => Ok(()),
        }
    }
}

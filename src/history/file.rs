//! JSON persistence for the calculation history.
//!
//! File shape:
//! ```json
//! { "saved_at": "2026-10-19T12:34:56Z",
//!   "records": [ { "operation": "add", "operand1": 1.0, "operand2": 2.0, "result": 3.0 } ] }
//! ```
//!
//! On load every entry is re-evaluated through [`Operation::apply`]; entries
//! with an unknown operation or invalid operands are skipped with a warning.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use super::CalculationRecord;
use crate::error::AppError;
use crate::operations::Operation;

/// On-disk shape of the history file.
#[derive(serde::Serialize, serde::Deserialize)]
struct HistoryFile {
    saved_at: String,
    records: Vec<RawRecord>,
}

/// Operation kept as a plain string so one unknown name does not reject the
/// whole file.
#[derive(serde::Serialize, serde::Deserialize)]
struct RawRecord {
    operation: String,
    operand1: f64,
    operand2: f64,
    #[serde(default)]
    result: Option<f64>,
}

/// Write `records` to `path`, replacing any previous contents.
pub fn save(path: &Path, records: &[CalculationRecord]) -> Result<(), AppError> {
    let file = HistoryFile {
        saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        records: records
            .iter()
            .map(|r| RawRecord {
                operation: r.operation().name().to_string(),
                operand1: r.operand1(),
                operand2: r.operand2(),
                result: Some(r.result()),
            })
            .collect(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::History(format!("cannot create {}: {e}", parent.display()))
        })?;
    }

    let data = serde_json::to_string_pretty(&file)
        .map_err(|e| AppError::History(format!("serialise history: {e}")))?;
    fs::write(path, data)
        .map_err(|e| AppError::History(format!("cannot write {}: {e}", path.display())))?;

    info!(path = %path.display(), count = records.len(), "history saved");
    Ok(())
}

/// Read records from `path`. Returns `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<Vec<CalculationRecord>>, AppError> {
    if !path.exists() {
        info!(path = %path.display(), "no history file found, starting fresh");
        return Ok(None);
    }

    let data = fs::read_to_string(path)
        .map_err(|e| AppError::History(format!("cannot read {}: {e}", path.display())))?;
    let file: HistoryFile = serde_json::from_str(&data)
        .map_err(|e| AppError::History(format!("malformed {}: {e}", path.display())))?;

    let mut records = Vec::with_capacity(file.records.len());
    for (index, raw) in file.records.into_iter().enumerate() {
        let Some(op) = Operation::lookup(&raw.operation) else {
            warn!(
                index,
                operation = %raw.operation,
                "skipping history entry with unknown operation"
            );
            continue;
        };
        match op.apply(raw.operand1, raw.operand2) {
            Ok(result) => {
                records.push(CalculationRecord::new(op, raw.operand1, raw.operand2, result));
            }
            Err(e) => warn!(index, error = %e, "skipping history entry that no longer evaluates"),
        }
    }

    info!(
        path = %path.display(),
        count = records.len(),
        saved_at = %file.saved_at,
        "history loaded"
    );
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<CalculationRecord> {
        vec![
            CalculationRecord::new(Operation::Add, 1.0, 2.0, 3.0),
            CalculationRecord::new(Operation::Divide, 1.0, 4.0, 0.25),
        ]
    }

    #[test]
    fn save_and_load_restores_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        save(&path, &sample()).unwrap();
        assert_eq!(load(&path).unwrap(), Some(sample()));
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/history.json");
        save(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load(&dir.path().join("absent.json")).unwrap(), None);
    }

    #[test]
    fn malformed_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn bad_entries_are_skipped_and_results_recomputed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(
            &path,
            r#"{ "saved_at": "2026-01-01T00:00:00Z", "records": [
                { "operation": "Multiply", "operand1": 3.0, "operand2": 4.0, "result": 999.0 },
                { "operation": "modulo", "operand1": 1.0, "operand2": 2.0, "result": 1.0 },
                { "operation": "divide", "operand1": 1.0, "operand2": 0.0 },
                { "operation": "subtract", "operand1": 5.0, "operand2": 2.0 }
            ] }"#,
        )
        .unwrap();

        let records = load(&path).unwrap().unwrap();
        assert_eq!(
            records,
            vec![
                CalculationRecord::new(Operation::Multiply, 3.0, 4.0, 12.0),
                CalculationRecord::new(Operation::Subtract, 5.0, 2.0, 3.0),
            ]
        );
    }
}

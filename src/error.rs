//! Application-wide error types.
//!
//! [`AppError`] covers startup and I/O failures (config, logger, history
//! file). [`CalcError`] is the per-line error a single REPL command can
//! produce; every variant is reported to the user and the loop continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("history error: {0}")]
    History(String),

    #[error("listener error: {0}")]
    Listener(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CalcError {
    /// Wrong token count or a non-numeric operand.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("invalid operands: {a}, {b} (inputs must be finite numbers)")]
    InvalidOperand { a: f64, b: f64 },

    #[error("division by zero is not allowed")]
    DivisionByZero,

    #[error(transparent)]
    App(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("config error"));
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn history_error_display() {
        let e = AppError::History("malformed file".into());
        assert!(e.to_string().contains("malformed file"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        let _: &dyn Error = &e;
    }

    #[test]
    fn app_error_is_transparent_inside_calc_error() {
        let e: CalcError = AppError::Listener("boom".into()).into();
        assert_eq!(e.to_string(), "listener error: boom");
    }

    #[test]
    fn invalid_operand_names_both_values() {
        let e = CalcError::InvalidOperand { a: f64::NAN, b: 1.0 };
        let msg = e.to_string();
        assert!(msg.contains("NaN"));
        assert!(msg.contains('1'));
    }
}

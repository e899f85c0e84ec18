//! Arithmetic operations and the name → operation registry.
//!
//! `Operation` is a closed enum: the set of operators is fixed, so dispatch
//! is a `match` rather than a trait object per operator. Every `apply` runs
//! the same steps: validate operands, execute, log the outcome.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Canonical lowercase name, as typed at the prompt.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Resolve an operation by name, ignoring case and surrounding
    /// whitespace. Unknown names return `None` so the caller can decide how
    /// to report them.
    pub fn lookup(name: &str) -> Option<Operation> {
        let wanted = name.trim();
        debug!(operation = %wanted, "resolving operation");
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(wanted))
    }

    /// Validate both operands, then compute `a <op> b`.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        if !a.is_finite() || !b.is_finite() {
            error!(
                operation = self.name(),
                a,
                b,
                "invalid input: operands must be finite numbers"
            );
            return Err(CalcError::InvalidOperand { a, b });
        }

        let result = match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    error!(a, "attempted to divide by zero");
                    return Err(CalcError::DivisionByZero);
                }
                a / b
            }
        };

        debug!(operation = self.name(), a, b, result, "operation performed");
        Ok(result)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Format a number for display: every finite integral value keeps one
/// decimal place (`15.0`, `1e20` as `100000000000000000000.0`); everything
/// else uses the shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Operation::lookup("add"), Some(Operation::Add));
        assert_eq!(Operation::lookup("ADD"), Some(Operation::Add));
        assert_eq!(Operation::lookup("Multiply"), Some(Operation::Multiply));
        assert_eq!(Operation::lookup("  divide "), Some(Operation::Divide));
    }

    #[test]
    fn lookup_unknown_is_none() {
        assert_eq!(Operation::lookup("modulo"), None);
        assert_eq!(Operation::lookup(""), None);
        assert_eq!(Operation::lookup("addition"), None);
    }

    #[test]
    fn every_variant_resolves_from_its_name() {
        for op in Operation::ALL {
            assert_eq!(Operation::lookup(op.name()), Some(op));
            assert_eq!(op.to_string(), op.name());
        }
    }

    #[test]
    fn arithmetic_results() {
        assert_eq!(Operation::Add.apply(10.0, 5.0).unwrap(), 15.0);
        assert_eq!(Operation::Subtract.apply(10.0, 5.0).unwrap(), 5.0);
        assert_eq!(Operation::Multiply.apply(3.0, 4.0).unwrap(), 12.0);
        assert_eq!(Operation::Divide.apply(20.0, 4.0).unwrap(), 5.0);
        assert_eq!(Operation::Divide.apply(1.0, 3.0).unwrap(), 1.0 / 3.0);
        assert_eq!(Operation::Add.apply(0.1, 0.2).unwrap(), 0.1 + 0.2);
    }

    #[test]
    fn divide_by_zero_fails_for_both_signs() {
        assert!(matches!(Operation::Divide.apply(5.0, 0.0), Err(CalcError::DivisionByZero)));
        assert!(matches!(Operation::Divide.apply(5.0, -0.0), Err(CalcError::DivisionByZero)));
        assert!(matches!(Operation::Divide.apply(0.0, 0.0), Err(CalcError::DivisionByZero)));
    }

    #[test]
    fn non_finite_operands_rejected() {
        for op in Operation::ALL {
            assert!(matches!(op.apply(f64::NAN, 1.0), Err(CalcError::InvalidOperand { .. })));
            assert!(matches!(op.apply(1.0, f64::INFINITY), Err(CalcError::InvalidOperand { .. })));
        }
        // Operand validation runs before the zero-divisor check.
        assert!(matches!(
            Operation::Divide.apply(f64::NEG_INFINITY, 0.0),
            Err(CalcError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn format_integral_keeps_one_decimal() {
        assert_eq!(format_number(15.0), "15.0");
        assert_eq!(format_number(-3.0), "-3.0");
        assert_eq!(format_number(0.0), "0.0");
    }

    #[test]
    fn format_large_integral_keeps_one_decimal() {
        assert_eq!(format_number(1e16), "10000000000000000.0");
        assert_eq!(format_number(1e20), "100000000000000000000.0");
        assert_eq!(format_number(-2e17), "-200000000000000000.0");
    }

    #[test]
    fn format_fractional_is_shortest_round_trip() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}

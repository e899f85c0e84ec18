//! Line-oriented REPL: reads commands, drives the [`Calculator`], prints
//! results.
//!
//! Generic over the input (`BufRead`) and output (`Write`) so the whole loop
//! can be exercised with in-memory buffers. Every per-line error is reported
//! on the output and the loop keeps running; only `exit`, end of input, or
//! an I/O failure on the streams stops it.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::calculator::Calculator;
use crate::error::{AppError, CalcError};
use crate::operations::format_number;

pub const BANNER: &str = "Welcome to the OOP Calculator! Type 'help' for available commands.";
pub const PROMPT: &str = "Enter an operation and two numbers, or a command: ";

const PARSE_HINT: &str =
    "Invalid input. Please enter a valid operation and two numbers. Type 'help' for instructions.";

const HELP: &str = "\
Available commands:
  add <num1> <num2>       : Add two numbers.
  subtract <num1> <num2>  : Subtract the second number from the first.
  multiply <num1> <num2>  : Multiply two numbers.
  divide <num1> <num2>    : Divide the first number by the second.
  list                    : Show the calculation history.
  clear                   : Clear the calculation history.
  save_history            : Save the history to the history file.
  load_history            : Load the history from the history file.
  exit                    : Exit the calculator.
";

// ── Commands ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Exit,
    List,
    Clear,
    SaveHistory,
    LoadHistory,
    /// `<op> <a> <b>`; the operator name is resolved at evaluation time.
    Evaluate { operation: String, a: f64, b: f64 },
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CalcError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let keyword = match trimmed.to_ascii_lowercase().as_str() {
        "help" => Some(Command::Help),
        "exit" => Some(Command::Exit),
        "list" => Some(Command::List),
        "clear" => Some(Command::Clear),
        "save_history" => Some(Command::SaveHistory),
        "load_history" => Some(Command::LoadHistory),
        _ => None,
    };
    if keyword.is_some() {
        return Ok(keyword);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let [operation, a, b] = tokens.as_slice() else {
        return Err(CalcError::Parse(format!(
            "expected 3 tokens (operation and two numbers), got {}",
            tokens.len()
        )));
    };

    Ok(Some(Command::Evaluate {
        operation: (*operation).to_string(),
        a: parse_operand(a)?,
        b: parse_operand(b)?,
    }))
}

fn parse_operand(token: &str) -> Result<f64, CalcError> {
    token
        .parse::<f64>()
        .map_err(|e| CalcError::Parse(format!("'{token}' is not a number: {e}")))
}

// ── State machine ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    Running,
    Terminated,
}

pub struct Repl<'a, W: Write> {
    calculator: &'a mut Calculator,
    out: W,
    state: ReplState,
}

impl<'a, W: Write> Repl<'a, W> {
    pub fn new(calculator: &'a mut Calculator, out: W) -> Self {
        Self { calculator, out, state: ReplState::Running }
    }

    pub fn state(&self) -> ReplState {
        self.state
    }

    /// Print the banner, then read and handle lines until `exit` or end of
    /// input. A line that is not valid UTF-8 is reported like any other
    /// malformed line; only a failing stream ends the session early.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<(), AppError> {
        writeln!(self.out, "{BANNER}")?;
        let mut buf = Vec::new();

        while self.state == ReplState::Running {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            buf.clear();
            let read = input.read_until(b'\n', &mut buf).map_err(|e| {
                warn!("stdin read error: {e}");
                self.state = ReplState::Terminated;
                e
            })?;
            if read == 0 {
                info!("stdin closed");
                writeln!(self.out)?;
                self.state = ReplState::Terminated;
                continue;
            }

            match std::str::from_utf8(&buf) {
                Ok(line) => {
                    self.handle_line(line)?;
                }
                Err(e) => {
                    warn!("invalid input: line is not valid UTF-8: {e}");
                    writeln!(self.out, "{PARSE_HINT}")?;
                }
            }
        }

        info!("calculator session ended");
        Ok(())
    }

    /// Handle a single line of input and return the resulting state.
    pub fn handle_line(&mut self, line: &str) -> Result<ReplState, AppError> {
        if self.state == ReplState::Terminated {
            return Ok(self.state);
        }
        debug!(input = %line.trim(), "received line");

        match parse_command(line) {
            Ok(None) => {}
            Ok(Some(command)) => self.execute(command)?,
            Err(e) => {
                warn!("invalid input: {e}");
                writeln!(self.out, "{PARSE_HINT}")?;
            }
        }
        Ok(self.state)
    }

    fn execute(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Help => writeln!(self.out, "\n{HELP}")?,
            Command::Exit => {
                writeln!(self.out, "Exiting calculator...")?;
                self.state = ReplState::Terminated;
            }
            Command::List => self.print_history()?,
            Command::Clear => match self.calculator.clear() {
                Ok(()) => writeln!(self.out, "History cleared.")?,
                Err(e) => writeln!(self.out, "History cleared, but it could not be saved: {e}")?,
            },
            Command::SaveHistory => match self.calculator.save_history() {
                Ok(path) => writeln!(self.out, "History saved to {}", path.display())?,
                Err(e) => writeln!(self.out, "Error: {e}")?,
            },
            Command::LoadHistory => {
                let loaded = self.calculator.load_history();
                let path = self
                    .calculator
                    .history_file()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                match loaded {
                    Ok(Some(count)) => {
                        writeln!(self.out, "History loaded from {path} ({count} calculations)")?;
                    }
                    Ok(None) => writeln!(
                        self.out,
                        "No history file found at {path}. Starting with an empty history."
                    )?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
            }
            Command::Evaluate { operation, a, b } => self.evaluate(&operation, a, b)?,
        }
        Ok(())
    }

    fn evaluate(&mut self, operation: &str, a: f64, b: f64) -> Result<(), AppError> {
        match self.calculator.evaluate(operation, a, b) {
            Ok(record) => writeln!(self.out, "Result: {}", format_number(record.result()))?,
            Err(CalcError::UnknownOperation(name)) => writeln!(
                self.out,
                "Unknown operation '{name}'. Type 'help' for available commands."
            )?,
            Err(CalcError::DivisionByZero) => {
                writeln!(self.out, "Error: Division by zero is not allowed.")?;
            }
            Err(CalcError::InvalidOperand { .. }) => {
                writeln!(self.out, "Error: Both inputs must be finite numbers.")?;
            }
            Err(CalcError::Parse(_)) => writeln!(self.out, "{PARSE_HINT}")?,
            Err(CalcError::App(e)) => {
                warn!("calculation recorded with errors: {e}");
                writeln!(self.out, "Error: {e}")?;
            }
        }
        Ok(())
    }

    fn print_history(&mut self) -> Result<(), AppError> {
        let records = self.calculator.history().list();
        if records.is_empty() {
            writeln!(self.out, "No calculations in history.")?;
        } else {
            for record in records {
                writeln!(self.out, "{record}")?;
            }
        }
        Ok(())
    }
}

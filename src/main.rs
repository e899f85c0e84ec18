//! calc-repl: interactive calculator entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (`config/default.toml` + env overrides)
//!   3. Validate the configured level, init logger
//!   4. Build the calculator, attach the logging listener
//!   5. Run the REPL on stdin/stdout until `exit` or end of input

use std::io;

use calc_repl::calculator::Calculator;
use calc_repl::error::AppError;
use calc_repl::history::LoggingListener;
use calc_repl::repl::Repl;
use calc_repl::{config, logger};
use tracing::info;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::parse_level(&config.log_level)?;
    logger::init(&config.log_level, true, config.log_file.as_deref())?;

    info!(
        log_level = %config.log_level,
        history_file = ?config.history_file,
        autosave = config.autosave,
        "config loaded"
    );

    let mut calculator = match &config.history_file {
        Some(path) => Calculator::new().with_history_file(path, config.autosave),
        None => Calculator::new(),
    };
    calculator.subscribe(Box::new(LoggingListener));

    if config.autosave && config.history_file.is_some() {
        let count = calculator.load_history()?.unwrap_or_default();
        info!(count, "restored history from previous session");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(&mut calculator, stdout.lock()).run(stdin.lock())
}

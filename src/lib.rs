// Library root: exposes internals for integration tests.
// The binary entry point is src/main.rs.

pub mod calculator;
pub mod config;
pub mod error;
pub mod history;
pub mod logger;
pub mod operations;
pub mod repl;

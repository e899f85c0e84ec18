//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (built-in defaults apply when the file is absent), then applies
//! `CALC_LOG_LEVEL`, `CALC_LOG_FILE` and `HISTORY_FILE` env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Fully-resolved calculator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: String,
    /// Append-mode diagnostic log. `None` logs to stderr.
    pub log_file: Option<PathBuf>,
    /// JSON history file used by `save_history` / `load_history`.
    pub history_file: Option<PathBuf>,
    /// Rewrite the history file after every change.
    pub autosave: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: Some(PathBuf::from(default_log_file())),
            history_file: None,
            autosave: false,
        }
    }
}

/// Env-sourced overrides. Tests build this directly instead of touching env.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    pub history_file: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("CALC_LOG_LEVEL").ok(),
            log_file: env::var("CALC_LOG_FILE").ok(),
            history_file: env::var("HISTORY_FILE").ok(),
        }
    }
}

/// Raw TOML shape: `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    calculator: RawCalculator,
}

#[derive(Deserialize)]
struct RawCalculator {
    #[serde(default = "default_log_level")]
    log_level: String,
    /// Empty string means "log to stderr".
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default)]
    history_file: Option<String>,
    #[serde(default)]
    autosave: bool,
}

impl Default for RawCalculator {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
            history_file: None,
            autosave: false,
        }
    }
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_file() -> String {
    "calculator.log".to_string()
}

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    load_from(Path::new(DEFAULT_CONFIG_PATH), &Overrides::from_env())
}

/// Internal loader: accepts an explicit path and overrides.
/// A missing file is not an error; a malformed one is.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let parsed = if path.exists() {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str::<RawConfig>(&raw)
            .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?
    } else {
        RawConfig::default()
    };

    let c = parsed.calculator;

    let log_level = overrides.log_level.clone().unwrap_or(c.log_level);
    let log_file = overrides.log_file.clone().unwrap_or(c.log_file);
    let history_file = overrides.history_file.clone().or(c.history_file);

    Ok(Config {
        log_level,
        log_file: non_empty_path(&log_file),
        history_file: history_file.as_deref().and_then(non_empty_path),
        autosave: c.autosave,
    })
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() { None } else { Some(expand_home(raw)) }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_TOML: &str = r#"
[calculator]
log_level = "info"
log_file = "/tmp/calc.log"
history_file = "history.json"
autosave = true
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_full_config() {
        let f = write_toml(FULL_TOML);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/calc.log")));
        assert_eq!(cfg.history_file, Some(PathBuf::from("history.json")));
        assert!(cfg.autosave);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_from(Path::new("/nonexistent/config.toml"), &Overrides::default()).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn empty_section_yields_defaults() {
        let f = write_toml("[calculator]\n");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.log_file, Some(PathBuf::from("calculator.log")));
        assert!(cfg.history_file.is_none());
        assert!(!cfg.autosave);
    }

    #[test]
    fn malformed_file_errors() {
        let f = write_toml("[calculator\nlog_level = ");
        let err = load_from(f.path(), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn empty_log_file_means_stderr() {
        let f = write_toml("[calculator]\nlog_file = \"\"\n");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn env_overrides_win() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides {
            log_level: Some("warn".into()),
            log_file: Some(String::new()),
            history_file: Some("/tmp/other.json".into()),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.log_file.is_none());
        assert_eq!(cfg.history_file, Some(PathBuf::from("/tmp/other.json")));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/calc/history.json");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with("history.json"));
    }

    #[test]
    fn relative_path_unchanged() {
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }
}

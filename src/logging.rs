//! Logging setup — one subscriber installed at process start.
//!
//! The verbosity comes from the CLI (or its environment variable
//! mirror); an optional JSON config file can instead supply a default
//! level plus per-target overrides.  A malformed config file is fatal
//! before any other work happens.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::errors::{ReportError, Result};

/// Verbosity levels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    /// Accepted for interoperability; tracing has no level above
    /// error, so this behaves like `error`.
    Critical,
}

impl LogLevel {
    /// The tracing filter directive for this level.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Shape of the optional logging config file.
#[derive(Debug, Deserialize)]
struct LogConfig {
    /// Default level for everything not matched by `targets`.
    #[serde(default)]
    default: Option<String>,

    /// Per-target level overrides, e.g. `{"lpreport::vault": "debug"}`.
    #[serde(default)]
    targets: BTreeMap<String, String>,
}

impl LogConfig {
    /// Compile the config into an `EnvFilter` directive string.
    fn directives(&self) -> String {
        let mut parts = Vec::new();
        if let Some(default) = &self.default {
            parts.push(default.clone());
        }
        for (target, level) in &self.targets {
            parts.push(format!("{target}={level}"));
        }
        parts.join(",")
    }
}

/// Install the global tracing subscriber.
///
/// Precedence: config file if given, else the CLI level.
pub fn init(level: LogLevel, config_file: Option<&str>) -> Result<()> {
    let filter = match config_file {
        Some(path) => filter_from_config_file(Path::new(path))?,
        None => EnvFilter::new(level.as_filter_str()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn filter_from_config_file(path: &Path) -> Result<EnvFilter> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ReportError::ConfigError(format!("cannot read {}: {e}", path.display()))
    })?;

    let config: LogConfig = serde_json::from_str(&contents).map_err(|_| {
        ReportError::ConfigError(format!(
            "File \"{}\" is not valid json, cannot continue.",
            path.display()
        ))
    })?;

    EnvFilter::try_new(config.directives()).map_err(|e| {
        ReportError::ConfigError(format!(
            "invalid log directive in {}: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn levels_map_to_tracing_directives() {
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Info.as_filter_str(), "info");
        assert_eq!(LogLevel::Warning.as_filter_str(), "warn");
        assert_eq!(LogLevel::Error.as_filter_str(), "error");
        assert_eq!(LogLevel::Critical.as_filter_str(), "error");
    }

    #[test]
    fn config_compiles_default_and_targets() {
        let config = LogConfig {
            default: Some("info".into()),
            targets: BTreeMap::from([("lpreport::vault".to_string(), "debug".to_string())]),
        };
        assert_eq!(config.directives(), "info,lpreport::vault=debug");
    }

    #[test]
    fn valid_config_file_parses() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logging.json");
        fs::write(
            &path,
            r#"{"default": "warn", "targets": {"lpreport": "debug"}}"#,
        )
        .unwrap();

        assert!(filter_from_config_file(&path).is_ok());
    }

    #[test]
    fn malformed_config_file_is_fatal_and_names_the_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logging.json");
        fs::write(&path, "{not json").unwrap();

        let err = filter_from_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("logging.json"));
        assert!(err.to_string().contains("not valid json"));
    }

    #[test]
    fn missing_config_file_is_fatal() {
        let missing = Path::new("/definitely/not/here.json");
        assert!(filter_from_config_file(missing).is_err());
    }
}

//! `simpleui.toml`: output names, destination, base stylesheet and log
//! level. Every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Name of the config file looked up next to the input document.
pub const CONFIG_FILE_NAME: &str = "simpleui.toml";

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file given explicitly does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("validation error: {field}: {message}")]
    Validation {
        /// Dotted key, e.g. `output.html`.
        field: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Config ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    /// Stylesheet library classes are copied from. The bundled one when
    /// unset.
    pub base_css: Option<PathBuf>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub html: String,
    pub stylesheet: String,
    pub script: String,
    /// Output directory. `<input dir>/generated` when unset.
    pub destination: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html: "index.html".to_string(),
            stylesheet: "stylesheet.css".to_string(),
            script: "script.js".to_string(),
            destination: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl Config {
    /// Parse and validate config text. Relative paths are left as written.
    pub fn from_toml_str(src: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(src).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, name) in [
            ("output.html", &self.output.html),
            ("output.stylesheet", &self.output.stylesheet),
            ("output.script", &self.output.script),
        ] {
            if name.is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
            if name.contains(['/', '\\']) {
                return Err(invalid(field, "must be a file name, not a path"));
            }
        }
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(invalid(
                "log.level",
                format!("expected one of {}, got `{}`", LOG_LEVELS.join(", "), self.log.level),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths against `dir`, the directory holding the
    /// config file.
    fn rebase(mut self, dir: &Path) -> Self {
        if let Some(dest) = self.output.destination.take() {
            self.output.destination = Some(dir.join(dest));
        }
        if let Some(css) = self.base_css.take() {
            self.base_css = Some(dir.join(css));
        }
        self
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation { field: field.to_string(), message: message.into() }
}

/// Load the config for a run.
///
/// `explicit` must exist when given. Otherwise `simpleui.toml` in
/// `search_dir` is used if present, and defaults if not.
pub fn load_config(explicit: Option<&Path>, search_dir: &Path) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = search_dir.join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                return Ok(Config::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path)?;
    let config = Config::from_toml_str(&content)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.rebase(dir))
}

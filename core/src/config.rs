//! Interpreter configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`QUT_CONFIG_PATH`, the builder's path, or `./qut.toml`)
//! 3. `QUT_*` environment variables (a `.env` file is loaded first)
//! 4. Explicit builder overrides (CLI flags)
//!
//! The legacy `DEBUG=true` variable also turns tracing on.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::interpreter::{DEFAULT_MAX_DISPATCH_DEPTH, DEFAULT_TAPE_LENGTH};

const ENV_PREFIX: &str = "QUT";
const DEFAULT_CONFIG_FILE: &str = "qut.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of cells on the tape
    pub tape_length: usize,

    /// Emit per-token and per-step diagnostics
    pub trace: bool,

    /// Nesting limit for indirect dispatch
    pub max_dispatch_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_length: DEFAULT_TAPE_LENGTH,
            trace: false,
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tape_length == 0 {
            return Err(ConfigError::Invalid(
                "tape_length must be at least 1".to_string(),
            ));
        }
        if self.max_dispatch_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_dispatch_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Builder for loading a [`Config`] with explicit overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    tape_length: Option<usize>,
    trace: Option<bool>,
    max_dispatch_depth: Option<usize>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Config file to read instead of the default search
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn tape_length(mut self, tape_length: Option<usize>) -> Self {
        self.tape_length = tape_length;
        self
    }

    pub fn trace(mut self, trace: Option<bool>) -> Self {
        self.trace = trace;
        self
    }

    pub fn max_dispatch_depth(mut self, depth: Option<usize>) -> Self {
        self.max_dispatch_depth = depth;
        self
    }

    /// Ignore `.env`, `QUT_*` and `DEBUG`; used where the process environment
    /// must not leak in
    pub fn skip_env(mut self, skip: bool) -> Self {
        self.skip_env = skip;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        if !self.skip_env {
            dotenvy::dotenv().ok();
        }

        let defaults = Config::default();
        let mut builder = config::Config::builder()
            .set_default("tape_length", defaults.tape_length as u64)?
            .set_default("trace", defaults.trace)?
            .set_default("max_dispatch_depth", defaults.max_dispatch_depth as u64)?;

        let explicit_path = self.config_path.clone().or_else(|| {
            if self.skip_env {
                None
            } else {
                std::env::var(format!("{ENV_PREFIX}_CONFIG_PATH"))
                    .ok()
                    .map(PathBuf::from)
            }
        });

        builder = match explicit_path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        if !self.skip_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .ignore_empty(true),
            );
        }

        let mut config: Config = builder.build()?.try_deserialize()?;

        if !self.skip_env && legacy_debug_enabled() {
            config.trace = true;
        }
        if let Some(tape_length) = self.tape_length {
            config.tape_length = tape_length;
        }
        if let Some(trace) = self.trace {
            config.trace = trace;
        }
        if let Some(depth) = self.max_dispatch_depth {
            config.max_dispatch_depth = depth;
        }

        config.validate()?;
        Ok(config)
    }
}

fn legacy_debug_enabled() -> bool {
    std::env::var("DEBUG").map(|v| v == "true").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tape_length, 10);
        assert!(!config.trace);
        assert_eq!(config.max_dispatch_depth, 8);
    }

    #[test]
    fn test_builder_overrides_win() {
        let config = Config::builder()
            .skip_env(true)
            .tape_length(Some(30))
            .trace(Some(true))
            .max_dispatch_depth(Some(2))
            .build()
            .expect("config should load");

        assert_eq!(config.tape_length, 30);
        assert!(config.trace);
        assert_eq!(config.max_dispatch_depth, 2);
    }

    #[test]
    fn test_zero_tape_length_rejected() {
        let result = Config::builder()
            .skip_env(true)
            .tape_length(Some(0))
            .build();

        let Err(ConfigError::Invalid(msg)) = result else {
            unreachable!("Expected ConfigError::Invalid, got {:?}", result);
        };
        assert!(msg.contains("tape_length"));
    }

    #[test]
    fn test_zero_dispatch_depth_rejected() {
        let result = Config::builder()
            .skip_env(true)
            .max_dispatch_depth(Some(0))
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_loads_toml_file() {
        let path = std::env::temp_dir().join(format!("qut-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "tape_length = 64").unwrap();
        writeln!(file, "trace = true").unwrap();
        drop(file);

        let config = Config::builder()
            .skip_env(true)
            .config_path(Some(path.clone()))
            .build()
            .expect("config should load");
        std::fs::remove_file(&path).ok();

        assert_eq!(config.tape_length, 64);
        assert!(config.trace);
        assert_eq!(config.max_dispatch_depth, DEFAULT_MAX_DISPATCH_DEPTH);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = Config::builder()
            .skip_env(true)
            .config_path(Some(PathBuf::from("/nonexistent/qut.toml")))
            .build();
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_to_toml_renders_all_fields() {
        let rendered = Config::default().to_toml().unwrap();
        assert!(rendered.contains("tape_length = 10"));
        assert!(rendered.contains("trace = false"));
        assert!(rendered.contains("max_dispatch_depth = 8"));
    }
}

//! Engine configuration.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CommandError, CommandResult};
use crate::ics::fold::{DEFAULT_FOLD_WIDTH, MIN_FOLD_WIDTH};

static DEFAULT_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

fn default_fold_width() -> usize {
    DEFAULT_FOLD_WIDTH
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

/// Configuration at ~/.config/calmanage/config.toml
///
/// Every key can also be set through a `CALMANAGE_` environment variable,
/// e.g. `CALMANAGE_FOLD_WIDTH=74`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum characters per content line when rewriting DESCRIPTION
    #[serde(default = "default_fold_width")]
    pub fold_width: usize,

    /// chrono format string for the audit separator timestamp (local time)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Namespace prepended to every command identifier, e.g. "calendar-manage: "
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_prefix: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            fold_width: default_fold_width(),
            timestamp_format: default_timestamp_format(),
            command_prefix: None,
        }
    }
}

impl EngineConfig {
    pub fn config_path() -> CommandResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CommandError::Config("Could not determine config directory".into()))?
            .join("calmanage");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> CommandResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (`~` is expanded), then apply environment overrides.
    pub fn load_from(path: &Path) -> CommandResult<Self> {
        let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());

        let config: EngineConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("CALMANAGE"))
            .build()
            .map_err(|e| CommandError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CommandError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CommandResult<()> {
        if self.fold_width < MIN_FOLD_WIDTH {
            return Err(CommandError::Config(format!(
                "fold_width must be at least {MIN_FOLD_WIDTH}, got {}",
                self.fold_width
            )));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(CommandError::Config("timestamp_format must not be empty".into()));
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(CommandError::Config(format!(
                "Invalid timestamp_format '{}'",
                self.timestamp_format
            )));
        }
        Ok(())
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CommandResult<()> {
        let contents = format!(
            "\
# calmanage configuration

# Maximum content-line width when rewriting DESCRIPTION:
# fold_width = {DEFAULT_FOLD_WIDTH}

# Timestamp format of the audit separator line:
# timestamp_format = \"{DEFAULT_TIMESTAMP_FORMAT}\"

# Namespace in front of every command name:
# command_prefix = \"calendar-manage: \"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CommandError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CommandError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fold_width = 60\ncommand_prefix = \"calendar-manage: \"\n").unwrap();

        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config.fold_width, 60);
        assert_eq!(config.command_prefix.as_deref(), Some("calendar-manage: "));
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn test_rejects_tiny_fold_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fold_width = 1\n").unwrap();

        let err = EngineConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    fn test_rejects_invalid_timestamp_format() {
        let config = EngineConfig {
            timestamp_format: "%Q".to_string(),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        EngineConfig::create_default_config(&path).unwrap();

        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}

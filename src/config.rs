use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::Strategy;

/// Which strategy each registry slot uses.
///
/// ```toml
/// default_strategy = "double_checked"
///
/// [slots]
/// database = "eager"
/// clock = "constant"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub default_strategy: Strategy,
    pub slots: HashMap<String, Strategy>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                log::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// The strategy configured for `name`, or the default one.
    pub fn strategy_for(&self, name: &str) -> Strategy {
        self.slots
            .get(name)
            .copied()
            .unwrap_or(self.default_strategy)
    }

    pub fn with_slot(mut self, name: impl Into<String>, strategy: Strategy) -> Self {
        self.slots.insert(name.into(), strategy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_empty_config() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(Strategy::DoubleChecked, config.default_strategy);
        assert!(config.slots.is_empty());
    }

    #[test]
    fn parse_slot_overrides() {
        let config = Config::from_toml_str(
            r#"
default_strategy = "holder"

[slots]
database = "eager"
metrics = "naive"
"#,
        )
        .unwrap();

        assert_eq!(Strategy::Eager, config.strategy_for("database"));
        assert_eq!(Strategy::Naive, config.strategy_for("metrics"));
        assert_eq!(Strategy::Holder, config.strategy_for("cache"));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let err = Config::from_toml_str(r#"default_strategy = "sometimes""#).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("strategy = \"eager\"").is_err());
    }

    #[test]
    fn with_slot_overrides_the_default() {
        let config = Config::default().with_slot("clock", Strategy::Constant);

        assert_eq!(Strategy::Constant, config.strategy_for("clock"));
        assert_eq!(Strategy::DoubleChecked, config.strategy_for("other"));
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_strategy = \"locked\"").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(Strategy::Locked, config.default_strategy);
    }

    #[test]
    fn load_reports_the_path_of_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        match Config::load(&path) {
            Err(ConfigError::Read { path: reported, .. }) => assert_eq!(path, reported),
            other => panic!("expected a read error, got {other:?}"),
        }
    }

    #[test]
    fn load_reports_parse_errors_with_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_strategy = 3").unwrap();

        let err = Config::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse config"));
    }
}

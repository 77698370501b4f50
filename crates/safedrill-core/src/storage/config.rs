//! TOML-based application configuration.
//!
//! Stores:
//! - Drill timing (settle delay, tick cadence) and the default siren toggle
//! - Scoring policy (points per completed drill)
//! - Custom drills that extend or replace the built-in ones
//!
//! Configuration is stored at `~/.config/safedrill/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::drill::{DrillCatalog, DrillDef, DrillOptions, FixedPoints, DEFAULT_SETTLE_DELAY_MS};
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::ticker::DEFAULT_TICK_INTERVAL_MS;

/// Drill timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillSettings {
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_true")]
    pub alarm_enabled: bool,
}

/// Scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_points")]
    pub points_per_completion: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/safedrill/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drill: DrillSettings,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub custom_drills: Vec<DrillDef>,
}

fn default_settle_delay() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}
fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}
fn default_true() -> bool {
    true
}
fn default_points() -> u32 {
    250
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            tick_interval_ms: default_tick_interval(),
            alarm_enabled: true,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_completion: default_points(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drill: DrillSettings::default(),
            scoring: ScoringConfig::default(),
            custom_drills: Vec::new(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.drill.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "drill.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            }
            .into());
        }
        self.catalog()?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn drill_options(&self) -> DrillOptions {
        DrillOptions {
            settle_delay_ms: self.drill.settle_delay_ms,
            alarm_enabled: self.drill.alarm_enabled,
        }
    }

    pub fn scoring_policy(&self) -> FixedPoints {
        FixedPoints(self.scoring.points_per_completion)
    }

    /// Built-in drills merged with the configured custom drills.
    pub fn catalog(&self) -> std::result::Result<DrillCatalog, ValidationError> {
        DrillCatalog::with_custom(&self.custom_drills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.drill.settle_delay_ms, 500);
        assert_eq!(parsed.scoring.points_per_completion, 250);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: Config = toml::from_str("[drill]\nsettle_delay_ms = 250\n").unwrap();
        assert_eq!(parsed.drill.settle_delay_ms, 250);
        assert_eq!(parsed.drill.tick_interval_ms, 100);
        assert!(parsed.drill.alarm_enabled);
    }

    #[test]
    fn get_nested_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("drill.settle_delay_ms").as_deref(), Some("500"));
        assert_eq!(cfg.get("drill.alarm_enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("drill.nope"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("drill.alarm_enabled", "false").unwrap();
        cfg.set("scoring.points_per_completion", "100").unwrap();
        assert!(!cfg.drill.alarm_enabled);
        assert_eq!(cfg.scoring_policy(), FixedPoints(100));
    }

    #[test]
    fn set_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("drill.speed", "2"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("drill.settle_delay_ms", "-1").is_err());
        assert!(cfg.set("drill.tick_interval_ms", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn custom_drill_with_negative_duration_fails_validation() {
        let toml_str = r#"
            [[custom_drills]]
            id = "flood"
            name = "Flood"

            [[custom_drills.steps]]
            id = "climb"
            title = "Climb"
            duration_ms = -10
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(CoreError::Validation(ValidationError::NegativeDuration { .. }))
        ));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("drill.settle_delay_ms", "250").unwrap();
        cfg.set(
            "custom_drills",
            r#"[{"id":"flood","name":"Flood","steps":[{"id":"climb","title":"Climb","duration_ms":3000}]}]"#,
        )
        .unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.drill_options().settle_delay_ms, 250);
        let catalog = loaded.catalog().unwrap();
        assert_eq!(catalog.get("flood").total_duration_ms(), 3000);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[drill\nsettle_delay_ms = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn load_validates_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[drill]\ntick_interval_ms = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));

        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load_from(&missing),
            Err(CoreError::Io(_))
        ));
    }
}

//! TOML-based engine configuration.
//!
//! Holds the tunables for the load classifier and the conflict detector.
//! Configuration is stored at `~/.config/daypulse/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::energy::EnergyConfig;
use crate::error::ConfigError;
use crate::scheduler::ConflictConfig;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daypulse/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub energy: EnergyConfig,
    #[serde(default)]
    pub conflicts: ConflictConfig,
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
    ) -> Result<(), ConfigError> {
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
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds invalid values, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default config");
                Self::default()
            }
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        let energy = &self.energy;
        if energy.sustainable_minutes == 0 {
            return Err(invalid("energy.sustainable_minutes", "must be greater than 0"));
        }
        if energy.overload_ratio.is_nan() || energy.overload_ratio <= 0.0 {
            return Err(invalid("energy.overload_ratio", "must be greater than 0"));
        }
        if energy.space_available_max > energy.balanced_pacing_max {
            return Err(invalid(
                "energy.space_available_max",
                "must not exceed energy.balanced_pacing_max",
            ));
        }
        if energy.default_duration_minutes <= 0 {
            return Err(invalid("energy.default_duration_minutes", "must be greater than 0"));
        }
        if energy.short_task_max_minutes > energy.medium_task_max_minutes {
            return Err(invalid(
                "energy.short_task_max_minutes",
                "must not exceed energy.medium_task_max_minutes",
            ));
        }
        if self.conflicts.event_default_minutes <= 0 {
            return Err(invalid("conflicts.event_default_minutes", "must be greater than 0"));
        }
        if self.conflicts.reminder_default_minutes <= 0 {
            return Err(invalid("conflicts.reminder_default_minutes", "must be greater than 0"));
        }
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

    /// Update a value in memory by dot-separated key.
    ///
    /// The new value must keep the field's type and pass [`Config::validate`].
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ConflictMode;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.energy.sustainable_minutes, 480);
        assert_eq!(parsed.conflicts.mode, ConflictMode::Adjacent);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[energy]\nsustainable_minutes = 420\n").unwrap();
        assert_eq!(parsed.energy.sustainable_minutes, 420);
        assert_eq!(parsed.energy.overload_ratio, 1.3);
        assert_eq!(parsed.conflicts.reminder_default_minutes, 15);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("energy.sustainable_minutes").as_deref(), Some("480"));
        assert_eq!(cfg.get("energy.overload_ratio").as_deref(), Some("1.3"));
        assert_eq!(cfg.get("conflicts.mode").as_deref(), Some("adjacent"));
        assert!(cfg.get("energy.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_number() {
        let mut cfg = Config::default();
        cfg.set_value("energy.sustainable_minutes", "420").unwrap();
        assert_eq!(cfg.energy.sustainable_minutes, 420);

        cfg.set_value("energy.overload_ratio", "1.5").unwrap();
        assert_eq!(cfg.energy.overload_ratio, 1.5);
    }

    #[test]
    fn set_value_updates_mode() {
        let mut cfg = Config::default();
        cfg.set_value("conflicts.mode", "same_day_sweep").unwrap();
        assert_eq!(cfg.conflicts.mode, ConflictMode::SameDaySweep);
        cfg.set_value("conflicts.mode", "sweep").unwrap();
        assert_eq!(cfg.conflicts.mode, ConflictMode::SameDaySweep);
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("energy.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("energy", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set_value("energy.sustainable_minutes", "lots").is_err());
        assert!(cfg.set_value("conflicts.mode", "everything").is_err());
        assert!(cfg.set_value("energy.sustainable_minutes", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set_value("conflicts.event_default_minutes", "45").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.conflicts.event_default_minutes, 45);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[energy]\noverload_ratio = \"high\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));

        std::fs::write(&path, "[energy]\nsustainable_minutes = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::wbs::CalendarRange;

const APP_NAME: &str = "wbs-planner";
const CONFIG_FILE: &str = "config.json";

/// Server and planner settings.
///
/// Loaded from `config.json` in the user's config directory, then overridden
/// by environment variables:
/// - `WBS_PLANNER_PORT`: HTTP port
/// - `WBS_PLANNER_CORS_ORIGINS`: allowed CORS origins, comma-separated
/// - `WBS_PLANNER_YEAR`: calendar year for new plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    /// Allowed CORS origins. `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    /// Default calendar for new plans.
    pub calendar: CalendarRange,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_origins: None,
            calendar: CalendarRange::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config directory and the environment.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        config
            .calendar
            .validate()
            .context("Invalid calendar in config file")?;

        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in [`Config::load`]).
    /// Values that fail to parse are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("WBS_PLANNER_PORT").and_then(|s| s.parse().ok()) {
            self.port = port;
        }

        if let Some(origins) = lookup("WBS_PLANNER_CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            self.cors_origins = (!origins.is_empty()).then_some(origins);
        }

        if let Some(year) = lookup("WBS_PLANNER_YEAR").and_then(|s| s.parse().ok()) {
            let calendar = CalendarRange { year, ..self.calendar };
            if calendar.validate().is_ok() {
                self.calendar = calendar;
            } else {
                tracing::warn!("Ignoring out-of-range WBS_PLANNER_YEAR={}", year);
            }
        }

        self
    }

    /// Save the configuration to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

/// Location of `config.json` in the platform config directory.
pub fn config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            port: 8080,
            cors_origins: Some(vec!["http://localhost:5173".to_string()]),
            calendar: CalendarRange::new(2027, 4, 6).unwrap(),
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"port": 4000}"#).unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.port, 4000);
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn invalid_calendar_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"calendar": {"year": 2026, "start_month": 6, "end_month": 2}}"#,
        )
        .unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = Config::default().with_overrides(lookup(&[
            ("WBS_PLANNER_PORT", "9000"),
            ("WBS_PLANNER_CORS_ORIGINS", "http://a.test, http://b.test"),
            ("WBS_PLANNER_YEAR", "2030"),
        ]));

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert_eq!(config.calendar.year, 2030);
    }

    #[test]
    fn unparsable_overrides_are_ignored() {
        let config = Config::default().with_overrides(lookup(&[
            ("WBS_PLANNER_PORT", "not-a-port"),
            ("WBS_PLANNER_CORS_ORIGINS", " , "),
        ]));

        assert_eq!(config.port, 3000);
        assert!(config.cors_origins.is_none());
    }
}

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{ActivityType, SampleTypeSet};
use crate::resolver::default_sample_type_set;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read error: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("TOML parse error: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub query: QueryConfig,
    pub permissions: PermissionConfig,
    pub store: StoreConfig,
    pub statistics: StatisticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub window_hours: u32,
    /// 0 disables periodic re-query; data is fetched once after authorization.
    pub refresh_interval_minutes: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PermissionConfig {
    pub share: Vec<ActivityType>,
    pub read: Vec<ActivityType>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: Option<PathBuf>,
    pub consent: ConsentPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsentPolicy {
    Grant,
    Deny,
    #[default]
    Prompt,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub step_days: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            window_hours: 24,
            refresh_interval_minutes: 0,
        }
    }
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self { step_days: 7 }
    }
}

impl PermissionConfig {
    pub fn share_set(&self) -> SampleTypeSet {
        Self::to_set(&self.share)
    }

    pub fn read_set(&self) -> SampleTypeSet {
        Self::to_set(&self.read)
    }

    fn to_set(activities: &[ActivityType]) -> SampleTypeSet {
        if activities.is_empty() {
            default_sample_type_set()
        } else {
            SampleTypeSet::from_activities(activities.iter().copied())
        }
    }
}

impl StoreConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("healthsync")
                .join("health.db")
        })
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("healthsync")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "display.interval_seconds must be positive".to_string(),
            });
        }
        if self.query.window_hours == 0 {
            return Err(ConfigError::Invalid {
                message: "query.window_hours must be positive".to_string(),
            });
        }
        if self.statistics.step_days == 0 {
            return Err(ConfigError::Invalid {
                message: "statistics.step_days must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SampleType;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();

        assert_eq!(config.display.interval_seconds, 60);
        assert_eq!(config.query.window_hours, 24);
        assert_eq!(config.query.refresh_interval_minutes, 0);
        assert_eq!(config.statistics.step_days, 7);
        assert_eq!(config.store.consent, ConsentPolicy::Prompt);
        assert!(config.store.database_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_permission_lists_fall_back_to_default_set() {
        let config = Config::default();

        assert_eq!(config.permissions.share_set().len(), 4);
        assert_eq!(config.permissions.read_set().len(), 4);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [display]
            interval_seconds = 900
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.display.interval_seconds, 900);
        assert_eq!(config.query.window_hours, 24);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [display]
            interval_seconds = 30

            [query]
            window_hours = 48
            refresh_interval_minutes = 15

            [permissions]
            share = ["mindfulness"]
            read = ["steps", "sleep"]

            [store]
            database_path = "/tmp/health.db"
            consent = "grant"

            [statistics]
            step_days = 14
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.display.interval_seconds, 30);
        assert_eq!(config.query.window_hours, 48);
        assert_eq!(config.query.refresh_interval_minutes, 15);
        assert_eq!(config.store.consent, ConsentPolicy::Grant);
        assert_eq!(config.store.database_path(), PathBuf::from("/tmp/health.db"));
        assert_eq!(config.statistics.step_days, 14);

        let share = config.permissions.share_set();
        assert_eq!(share.len(), 1);
        assert!(share.contains(SampleType::MindfulSession));

        let read = config.permissions.read_set();
        assert!(read.contains(SampleType::StepCount));
        assert!(read.contains(SampleType::SleepAnalysis));
        assert!(!read.contains(SampleType::Workout));
    }

    #[test]
    fn unknown_activity_is_a_parse_error() {
        let toml = r#"
            [permissions]
            read = ["heart_rate"]
        "#;

        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn zero_interval_is_invalid() {
        let toml = r#"
            [display]
            interval_seconds = 0
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("healthsync-missing-config.toml");

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.display.interval_seconds, 60);
    }
}

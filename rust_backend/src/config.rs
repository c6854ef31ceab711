//! Configuration file support.
//!
//! Settings are read from a TOML file; every section and field is optional
//! and falls back to the built-in defaults.
//!
//! ```toml
//! [analytics]
//! month_window = 12
//! imputation = "fixed_date"     # or "distribute"
//! default_date = "2024-01-01"
//! active_policy = "retire_date_blank"
//!
//! [axis]
//! multiplier = 1.1
//!
//! [categories]
//! departments = ["人事", "営業", "開発", "派遣"]
//!
//! [company]
//! company_id = "c1"
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::analytics::{
    default_imputation_date, AnalyticsSettings, ImputationPolicy, DEFAULT_MONTH_WINDOW,
    MAX_MONTH_WINDOW,
};
use crate::services::categories::CategoryCandidates;
use crate::services::nice_axis::{NiceAxisRequest, MAX_AXIS_CEILING, MAX_TICK_COUNT};
use crate::transformations::ActivePolicy;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "roster.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No roster.toml found in standard locations")]
    NotFound,
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub analytics: AnalyticsConfig,
    pub axis: AxisConfig,
    pub categories: CategoryCandidates,
    pub company: CompanyConfig,
}

/// Imputation strategy name in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationKind {
    #[default]
    FixedDate,
    Distribute,
}

/// `[analytics]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub month_window: u32,
    pub imputation: ImputationKind,
    pub default_date: NaiveDate,
    /// Pin the active-status policy instead of detecting it per dataset.
    pub active_policy: Option<ActivePolicy>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            month_window: DEFAULT_MONTH_WINDOW,
            imputation: ImputationKind::default(),
            default_date: default_imputation_date(),
            active_policy: None,
        }
    }
}

impl AnalyticsConfig {
    pub fn settings(&self) -> AnalyticsSettings {
        AnalyticsSettings {
            month_window: self.month_window,
            imputation: match self.imputation {
                ImputationKind::FixedDate => ImputationPolicy::FixedDate(self.default_date),
                ImputationKind::Distribute => ImputationPolicy::Distribute,
            },
        }
    }
}

/// `[axis]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub multiplier: f64,
    pub min_max: f64,
    pub desired_tick_count: u32,
    pub min_tick_count: u32,
    pub max_tick_count: u32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        let request = NiceAxisRequest::default();
        Self {
            multiplier: 1.1,
            min_max: request.min_max,
            desired_tick_count: request.desired_tick_count,
            min_tick_count: request.min_tick_count,
            max_tick_count: request.max_tick_count,
        }
    }
}

impl AxisConfig {
    /// Nice-axis request for a data maximum.
    pub fn request(&self, max_value: f64) -> NiceAxisRequest {
        NiceAxisRequest {
            max_value,
            multiplier: self.multiplier,
            min_max: self.min_max,
            desired_tick_count: self.desired_tick_count,
            min_tick_count: self.min_tick_count,
            max_tick_count: self.max_tick_count,
        }
    }
}

/// `[company]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub company_id: String,
}

impl RosterConfig {
    /// Parse configuration from TOML text.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: RosterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RosterConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `roster.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("rust_backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let window = self.analytics.month_window;
        if !(1..=MAX_MONTH_WINDOW).contains(&window) {
            return Err(ConfigError::Invalid(format!(
                "analytics.month_window ({}) must be between 1 and {}",
                window, MAX_MONTH_WINDOW
            )));
        }
        let axis = &self.axis;
        if !axis.min_max.is_finite() || !(1.0..=MAX_AXIS_CEILING).contains(&axis.min_max) {
            return Err(ConfigError::Invalid(format!(
                "axis.min_max ({}) must be between 1 and {}",
                axis.min_max, MAX_AXIS_CEILING
            )));
        }
        if !axis.multiplier.is_finite() {
            return Err(ConfigError::Invalid("axis.multiplier must be finite".to_string()));
        }
        if axis.max_tick_count > MAX_TICK_COUNT {
            return Err(ConfigError::Invalid(format!(
                "axis.max_tick_count ({}) exceeds {}",
                axis.max_tick_count, MAX_TICK_COUNT
            )));
        }
        if axis.min_tick_count > axis.max_tick_count {
            return Err(ConfigError::Invalid(format!(
                "axis.min_tick_count ({}) exceeds axis.max_tick_count ({})",
                axis.min_tick_count, axis.max_tick_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RosterConfig::from_str("").unwrap();
        assert_eq!(config, RosterConfig::default());
        assert_eq!(config.analytics.settings(), AnalyticsSettings::default());
        assert_eq!(config.categories, CategoryCandidates::default());
    }

    #[test]
    fn test_parse_sections() {
        let config = RosterConfig::from_str(
            r#"
            [analytics]
            month_window = 6
            imputation = "distribute"
            active_policy = "explicit_flag"

            [axis]
            multiplier = 1.2

            [categories]
            departments = ["総務"]

            [company]
            company_id = "c1"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.analytics.settings(),
            AnalyticsSettings {
                month_window: 6,
                imputation: ImputationPolicy::Distribute,
            }
        );
        assert_eq!(config.analytics.active_policy, Some(ActivePolicy::ExplicitFlag));
        assert_eq!(config.axis.request(10.0).multiplier, 1.2);
        assert_eq!(config.categories.departments, vec!["総務"]);
        assert_eq!(config.categories.reasons, CategoryCandidates::default().reasons);
        assert_eq!(config.company.company_id, "c1");
    }

    #[test]
    fn test_fixed_date() {
        let config = RosterConfig::from_str("[analytics]\ndefault_date = \"2025-04-01\"\n").unwrap();
        assert_eq!(
            config.analytics.settings().imputation,
            ImputationPolicy::FixedDate(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
        );
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            RosterConfig::from_str("[analytics]\nmonth_window = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RosterConfig::from_str("[analytics]\nmonth_window = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_month_window_bounds() {
        let at_limit = format!("[analytics]\nmonth_window = {}\n", MAX_MONTH_WINDOW);
        assert_eq!(
            RosterConfig::from_str(&at_limit).unwrap().analytics.month_window,
            MAX_MONTH_WINDOW
        );
        assert!(matches!(
            RosterConfig::from_str("[analytics]\nmonth_window = 1201\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RosterConfig::from_str("[analytics]\nmonth_window = 3000000000\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_axis_bounds() {
        for bad in ["min_max = 0.5", "min_max = 1e16", "min_max = nan", "min_max = inf", "multiplier = inf", "max_tick_count = 500"] {
            let text = format!("[axis]\n{}\n", bad);
            assert!(
                matches!(RosterConfig::from_str(&text), Err(ConfigError::Invalid(_))),
                "{} should be rejected",
                bad
            );
        }
        let config = RosterConfig::from_str("[axis]\nmin_max = 10.0\n").unwrap();
        assert_eq!(config.axis.min_max, 10.0);
    }

    #[test]
    fn test_bundled_sample_matches_defaults() {
        let config = RosterConfig::from_str(include_str!("../roster.toml")).unwrap();
        assert_eq!(config, RosterConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[company]\ncompany_id = \"c9\"").unwrap();
        let config = RosterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.company.company_id, "c9");

        assert!(matches!(
            RosterConfig::from_file("/nonexistent/roster.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}

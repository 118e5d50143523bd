//! Configuration management for assetdesk
//!
//! Loads and validates the YAML configuration: where the exported data
//! lives, how the business calendar behaves (offset, morning cutoff) and
//! how reports are paginated and cached.

pub mod error;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Data file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the JSON exports
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Asset transactions export
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,
    /// Asset reminders export
    #[serde(default = "default_reminders_file")]
    pub reminders_file: String,
    /// CRC reminders export
    #[serde(default = "default_crc_reminders_file")]
    pub crc_reminders_file: String,
    /// Staff directory export
    #[serde(default = "default_staff_file")]
    pub staff_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            transactions_file: default_transactions_file(),
            reminders_file: default_reminders_file(),
            crc_reminders_file: default_crc_reminders_file(),
            staff_file: default_staff_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_transactions_file() -> String {
    "asset_transactions.json".to_string()
}

fn default_reminders_file() -> String {
    "asset_reminders.json".to_string()
}

fn default_crc_reminders_file() -> String {
    "crc_reminders.json".to_string()
}

fn default_staff_file() -> String {
    "staff.json".to_string()
}

/// Report and business calendar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Offset of the business time zone from UTC, in whole hours
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Morning cutoff ("HH:MM"); at or after it the morning report targets
    /// the next working day
    #[serde(default = "default_cutoff")]
    pub cutoff: String,
    /// Rows per report page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Rooms whose afternoon pickups are processed together with the
    /// morning run
    #[serde(default = "default_branch_rooms")]
    pub branch_rooms: Vec<String>,
    /// Mode selected when none is given
    #[serde(default)]
    pub default_mode: ReportMode,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            cutoff: default_cutoff(),
            page_size: default_page_size(),
            branch_rooms: default_branch_rooms(),
            default_mode: ReportMode::default(),
        }
    }
}

impl ReportConfig {
    /// Parse the configured cutoff
    pub fn cutoff_time(&self) -> ConfigResult<NaiveTime> {
        NaiveTime::parse_from_str(&self.cutoff, "%H:%M").map_err(|_| ConfigError::InvalidValue {
            field: "report.cutoff".to_string(),
            reason: format!("Expected HH:MM, got '{}'", self.cutoff),
        })
    }
}

fn default_utc_offset_hours() -> i32 {
    7
}

fn default_cutoff() -> String {
    "08:06".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_branch_rooms() -> Vec<String> {
    ["CMT8", "NS", "ĐS", "LĐH"]
        .iter()
        .map(|room| room.to_string())
        .collect()
}

/// Report filter mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Everything dated today
    Today,
    /// Everything dated on the next working day
    NextDay,
    /// Morning shift of the morning-target date
    Morning,
    /// Afternoon shift of the next working day
    Afternoon,
    /// Morning shift plus branch-room afternoons of the morning-target date
    #[default]
    QlnPgdNextDay,
    /// User supplied range
    Custom,
}

impl std::str::FromStr for ReportMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(ReportMode::Today),
            "next_day" => Ok(ReportMode::NextDay),
            "morning" => Ok(ReportMode::Morning),
            "afternoon" => Ok(ReportMode::Afternoon),
            "qln_pgd_next_day" => Ok(ReportMode::QlnPgdNextDay),
            "custom" => Ok(ReportMode::Custom),
            _ => Err(format!("Invalid report mode: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Today => write!(f, "today"),
            ReportMode::NextDay => write!(f, "next_day"),
            ReportMode::Morning => write!(f, "morning"),
            ReportMode::Afternoon => write!(f, "afternoon"),
            ReportMode::QlnPgdNextDay => write!(f, "qln_pgd_next_day"),
            ReportMode::Custom => write!(f, "custom"),
        }
    }
}

/// Bulk transaction cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time to live in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Records kept per cached fetch
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_records: default_max_records(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_records() -> usize {
    3000
}

/// Reminder mail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Appended to a staff member's mailbox prefix to form the address
    #[serde(default = "default_email_suffix")]
    pub email_suffix: String,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            email_suffix: default_email_suffix(),
        }
    }
}

fn default_email_suffix() -> String {
    ".hvu@vietcombank.com.vn".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Data file settings
    #[serde(default)]
    pub data: DataConfig,
    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Reminder settings
    #[serde(default)]
    pub reminders: RemindersConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if !(-12..=14).contains(&self.report.utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                field: "report.utc_offset_hours".to_string(),
                reason: "Offset must be between -12 and 14".to_string(),
            });
        }

        self.report.cutoff_time()?;

        if self.report.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "report.page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.report.branch_rooms.iter().any(|room| room.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "report.branch_rooms".to_string(),
                reason: "Room names must not be empty".to_string(),
            });
        }

        if self.cache.max_records == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.max_records".to_string(),
                reason: "At least one record must be cached".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full path to the transactions export
    pub fn transactions_path(&self) -> PathBuf {
        self.data.path.join(&self.data.transactions_file)
    }

    /// Full path to the asset reminders export
    pub fn reminders_path(&self) -> PathBuf {
        self.data.path.join(&self.data.reminders_file)
    }

    /// Full path to the CRC reminders export
    pub fn crc_reminders_path(&self) -> PathBuf {
        self.data.path.join(&self.data.crc_reminders_file)
    }

    /// Full path to the staff directory export
    pub fn staff_path(&self) -> PathBuf {
        self.data.path.join(&self.data.staff_file)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.report.utc_offset_hours, 7);
        assert_eq!(config.report.page_size, 10);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.max_records, 3000);
        assert_eq!(config.report.default_mode, ReportMode::QlnPgdNextDay);
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.report.cutoff, "08:06");
        assert_eq!(config.report.branch_rooms.len(), 4);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("report:\n  page_size: 25\n").unwrap();
        assert_eq!(config.report.page_size, 25);
        assert_eq!(config.report.cutoff, "08:06");
        assert_eq!(config.data.transactions_file, "asset_transactions.json");
    }

    #[test]
    fn test_cutoff_time() {
        let report = ReportConfig::default();
        assert_eq!(
            report.cutoff_time().unwrap(),
            NaiveTime::from_hms_opt(8, 6, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_cutoff_rejected() {
        let result = Config::from_yaml("report:\n  cutoff: \"8h06\"\n");
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "report.cutoff"),
            other => panic!("expected invalid cutoff, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let result = Config::from_yaml("report:\n  utc_offset_hours: 20\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = Config::from_yaml("report:\n  page_size: 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = Config::from_yaml("report: [unclosed");
        assert!(matches!(result, Err(ConfigError::InvalidYaml { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(PathBuf::from("/nonexistent/assetdesk.yaml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_report_mode_from_str() {
        assert_eq!("today".parse::<ReportMode>().unwrap(), ReportMode::Today);
        assert_eq!("NEXT_DAY".parse::<ReportMode>().unwrap(), ReportMode::NextDay);
        assert_eq!(
            "qln_pgd_next_day".parse::<ReportMode>().unwrap(),
            ReportMode::QlnPgdNextDay
        );
        assert!("weekly".parse::<ReportMode>().is_err());
    }

    #[test]
    fn test_report_mode_display_round_trips_serde_name() {
        let yaml = serde_yaml::to_string(&ReportMode::QlnPgdNextDay).unwrap();
        assert_eq!(yaml.trim(), ReportMode::QlnPgdNextDay.to_string());
    }

    #[test]
    fn test_data_paths() {
        let config = Config::default();
        assert_eq!(
            config.transactions_path(),
            PathBuf::from("./data/asset_transactions.json")
        );
        assert_eq!(config.staff_path(), PathBuf::from("./data/staff.json"));
    }
}

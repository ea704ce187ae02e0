//! Configuration for the Extractor

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum number of inferred tags
    pub max_tags: usize,

    /// Hour used when a date is recognized without a clock time
    pub end_of_day_hour: u32,

    /// Minute used when a date is recognized without a clock time
    pub end_of_day_minute: u32,

    /// Treat a Chinese hour without a period word (e.g. "3点") as afternoon
    pub bare_hour_is_afternoon: bool,

    /// Optional TOML file with extra lexicon triggers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<PathBuf>,
}

impl ExtractorConfig {
    /// Clock time applied to dates without an explicit time
    pub fn end_of_day(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.end_of_day_hour, self.end_of_day_minute, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tags == 0 {
            return Err("max_tags must be greater than 0".to_string());
        }
        if self.end_of_day_hour > 23 {
            return Err("end_of_day_hour must be between 0 and 23".to_string());
        }
        if self.end_of_day_minute > 59 {
            return Err("end_of_day_minute must be between 0 and 59".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_tags: 3,
            end_of_day_hour: 23,
            end_of_day_minute: 59,
            bare_hour_is_afternoon: true,
            lexicon_path: None,
        }
    }
}

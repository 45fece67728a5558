//! Configuration management for sevkiyat-rapor
//!
//! Config stored at: ~/.config/sevkiyat-rapor/config.json

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use sevkiyat_types::{ConfigError, OutputFormat, Result, UnmatchedPolicy};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override (records, roster, vehicle registry)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Reference Sunday anchoring the fixed 7-day week windows
    #[serde(default = "default_week_reference")]
    pub week_reference: NaiveDate,

    /// What to do with delivery rows whose name has no roster match
    #[serde(default)]
    pub unmatched_policy: UnmatchedPolicy,

    /// How long a cached aggregation result stays fresh
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: i64,
}

fn default_week_reference() -> NaiveDate {
    // The Sunday the business's Sunday-to-Saturday cycle is anchored to
    NaiveDate::from_ymd_opt(2025, 6, 29).expect("valid date")
}

fn default_cache_ttl_minutes() -> i64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            output_format: OutputFormat::Table,
            week_reference: default_week_reference(),
            unmatched_policy: UnmatchedPolicy::Skip,
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("sevkiyat-rapor");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("sevkiyat-rapor");
        Ok(data_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sevkiyat Rapor Configuration")?;
        writeln!(f, "============================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Data dir:         {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:    {}", self.output_format)?;
        writeln!(f, "Week reference:   {}", self.week_reference)?;
        writeln!(
            f,
            "Unmatched policy: {}",
            match self.unmatched_policy {
                UnmatchedPolicy::Skip => "skip",
                UnmatchedPolicy::RetainRaw => "retain-raw",
            }
        )?;
        writeln!(f, "Cache TTL:        {} min", self.cache_ttl_minutes)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}

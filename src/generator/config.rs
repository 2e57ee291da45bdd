//! Generator configuration
//!
//! Defaults reproduce the reference dataset: 5000 opportunities over 2024,
//! seed 42. Values can be overridden from a TOML file and then from the CLI.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, GenerateError};

/// Days in the creation window, counted from `start_date`.
pub const CREATION_WINDOW_DAYS: u64 = 365;
/// Shortest sales cycle in days.
pub const MIN_CYCLE_DAYS: u64 = 30;
/// Longest sales cycle in days.
pub const MAX_CYCLE_DAYS: u64 = 180;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of records to generate.
    #[serde(default = "default_n_opportunities")]
    pub n_opportunities: usize,

    /// Origin of the one-year creation window (`"YYYY-MM-DD"`).
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Seed for the random stream.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Deal-size distribution parameters.
    #[serde(default)]
    pub deal_size: DealSizeParams,
}

fn default_n_opportunities() -> usize {
    5000
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn default_seed() -> u64 {
    42
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_opportunities: default_n_opportunities(),
            start_date: default_start_date(),
            seed: default_seed(),
            deal_size: DealSizeParams::default(),
        }
    }
}

/// Log-normal parameters of the underlying normal distribution.
/// The defaults give a heavy right tail: a few deals dominate pipeline value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DealSizeParams {
    #[serde(default = "default_location")]
    pub location: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_location() -> f64 {
    10.0
}

fn default_scale() -> f64 {
    1.5
}

impl Default for DealSizeParams {
    fn default() -> Self {
        Self {
            location: default_location(),
            scale: default_scale(),
        }
    }
}

impl GeneratorConfig {
    /// Load from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenerateError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Save to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GenerateError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check the config before any record is drawn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_opportunities == 0 {
            return Err(ConfigError::ZeroOpportunities);
        }
        // Latest possible close date must be representable.
        let horizon = CREATION_WINDOW_DAYS - 1 + MAX_CYCLE_DAYS;
        if self.start_date.checked_add_days(Days::new(horizon)).is_none() {
            return Err(ConfigError::InvalidStartDate(self.start_date.to_string()));
        }
        if !self.deal_size.location.is_finite()
            || !self.deal_size.scale.is_finite()
            || self.deal_size.scale <= 0.0
        {
            return Err(ConfigError::Parse(format!(
                "deal_size needs a finite location and positive scale, got {:?}",
                self.deal_size
            )));
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidStartDate(s.to_string()))
}

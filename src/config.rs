//! Configuration for archive generation.

use std::path::Path;

use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::{Serialize, Deserialize};

use crate::error::{ArchiveError, Result};
use crate::generator::volume::growth_weight;
use crate::random::DEFAULT_SEED;

/// Configuration parameters for archive generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Seed for the random source (default: 12345).
    pub seed: u64,

    /// First day of operation, inclusive.
    pub start_date: NaiveDate,

    /// Last day of operation, inclusive.
    pub end_date: NaiveDate,

    /// Kiosk local time as an offset from UTC, in hours (Korea: +9).
    pub utc_offset_hours: i32,

    /// Local hour the exhibition opens.
    pub opening_hour: u32,

    /// Local hour the exhibition closes (exclusive).
    pub closing_hour: u32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start_date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 30).unwrap_or_default(),
            utc_offset_hours: 9,
            opening_hour: 10,
            closing_hour: 20,
        }
    }
}

impl ArchiveConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ArchiveError::io(path, e))?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ArchiveError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Kiosk time zone.
    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ArchiveError::InvalidConfig(format!("UTC offset {}h is out of range", self.utc_offset_hours))
            })
    }

    /// Number of days in the operating window.
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(ArchiveError::InvalidConfig(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date,
            )));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ArchiveError::InvalidConfig(format!(
                "UTC offset {}h is out of range",
                self.utc_offset_hours,
            )));
        }
        if self.opening_hour >= self.closing_hour || self.closing_hour > 24 {
            return Err(ArchiveError::InvalidConfig(format!(
                "opening hours {}:00-{}:00 are not a valid range",
                self.opening_hour, self.closing_hour,
            )));
        }
        for year in self.start_date.year()..=self.end_date.year() {
            if growth_weight(year).is_none() {
                return Err(ArchiveError::UnmodeledYear(year));
            }
        }
        Ok(())
    }
}

//! Archive synthesizer.
//!
//! Walks the operating window day by day and manufactures one survey
//! response per synthetic visitor. Every draw comes from one shared random
//! source, in this order:
//!
//! - per day: the base visitor count;
//! - per visitor:
//!   1. time of day;
//!   2. room 1, room 2, room 3 fragrance picks;
//!   3. main fragrance (one to three draws, see `sample_main_fragrance`),
//!      after which the main fragrance overwrites its room's pick;
//!   4. emphasized room (one or two draws);
//!   5. id suffix;
//!   6. age (two draws), gender, music genre, ratio, satisfaction.
//!
//! Holiday visitors are emitted before the day's regular visitors.

use chrono::{Datelike, FixedOffset};
use tracing::{debug, info};

use crate::calendar::{DayCursor, VisitDay};
use crate::catalog::Catalog;
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::random::SeededRandom;
use crate::survey::SurveyResponse;

use super::samplers;
use super::volume::{self, DayVolume};

/// Generates the synthetic response archive.
pub struct Synthesizer {
    rng: SeededRandom,
    config: ArchiveConfig,
    catalog: Catalog,
    offset: FixedOffset,
}

impl Synthesizer {
    /// Create a synthesizer, validating the configuration up front.
    pub fn new(config: ArchiveConfig, catalog: Catalog) -> Result<Self> {
        config.validate()?;
        let offset = config.offset()?;
        Ok(Self {
            rng: SeededRandom::new(config.seed),
            config,
            catalog,
            offset,
        })
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate the full archive. Resets the random source first, so
    /// repeated calls return identical responses.
    pub fn generate(&mut self) -> Result<Vec<SurveyResponse>> {
        self.rng.reset(self.config.seed);
        info!(
            seed = self.config.seed,
            start = %self.config.start_date,
            end = %self.config.end_date,
            "generating response archive",
        );

        let mut responses = Vec::new();
        for day in DayCursor::new(self.config.start_date, self.config.end_date) {
            if day.day() == 1 || day.date == self.config.start_date {
                debug!(month = %day.date.format("%Y-%m"), so_far = responses.len(), "entering month");
            }
            self.synthesize_day(&day, &mut responses)?;
        }

        info!(total = responses.len(), "archive generated");
        Ok(responses)
    }

    /// Plan one day's volume and append its visitors.
    fn synthesize_day(&mut self, day: &VisitDay, out: &mut Vec<SurveyResponse>) -> Result<DayVolume> {
        let weight = volume::month_weight(day.year(), day.month())
            .ok_or(ArchiveError::UnmodeledYear(day.year()))?;
        let planned = volume::plan_day(&mut self.rng, day, weight);

        let (open, close) = day
            .opening_window(self.config.opening_hour, self.config.closing_hour, &self.offset)
            .ok_or_else(|| ArchiveError::InvalidConfig(format!("no opening hours on {}", day)))?;

        out.reserve(planned.total() as usize);
        for _ in 0..planned.total() {
            let response = self.synthesize_visitor(day, open, close);
            out.push(response);
        }
        Ok(planned)
    }

    fn synthesize_visitor(&mut self, day: &VisitDay, open: i64, close: i64) -> SurveyResponse {
        let timestamp = (open as f64 + self.rng.next() * (close - open) as f64).floor() as i64;

        let mut slots = samplers::pick_per_exhibition(&mut self.rng, &self.catalog);
        let main = samplers::sample_main_fragrance(&mut self.rng, &self.catalog, day.date.month(), &slots);
        slots[main.exhibition.index()] = main.id;

        let emphasized = samplers::sample_emphasized(&mut self.rng, main.exhibition);
        let suffix = samplers::id_suffix(self.rng.next());

        let age = samplers::sample_age(&mut self.rng);
        let gender = samplers::sample_gender(&mut self.rng);
        let music_genre = samplers::sample_music_genre(&mut self.rng);
        let fragrance_ratio = samplers::sample_ratio(&mut self.rng);
        let satisfaction = samplers::sample_satisfaction(&mut self.rng);

        SurveyResponse {
            id: format!("mock-{}-{}", timestamp, suffix),
            age,
            gender,
            selected_fragrance_id: main.id,
            fragrance_name: main.name,
            season: Some(main.season),
            music_genre,
            fragrance_ratio,
            emphasized_fragrance: Some(emphasized),
            selected_fragrance1: Some(slots[0]),
            selected_fragrance2: Some(slots[1]),
            selected_fragrance3: Some(slots[2]),
            satisfaction: Some(satisfaction),
            timestamp,
        }
    }
}

/// Generate the published archive: default config, embedded catalog.
pub fn generate_archive() -> Result<Vec<SurveyResponse>> {
    Synthesizer::new(ArchiveConfig::default(), Catalog::defaults())?.generate()
}

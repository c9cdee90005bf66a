//! Integrity audit for a response archive.
//!
//! Per-record checks run in parallel; the cross-record checks (unique ids,
//! day order) run afterwards in a single pass.

use std::collections::HashMap;
use std::fmt;

use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::{Catalog, Exhibition};
use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::survey::SurveyResponse;

pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 18..=55;
pub const SATISFACTION_RANGE: std::ops::RangeInclusive<u8> = 3..=5;

const SLOT_FIELDS: [&str; 3] = ["selectedFragrance1", "selectedFragrance2", "selectedFragrance3"];

/// A broken record property. `index` is the record's position in the archive.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    UnknownFragrance { index: usize, id: u32 },
    SlotOutsideExhibition { index: usize, exhibition: Exhibition, id: u32 },
    MainNotInSlots { index: usize, id: u32 },
    NameMismatch { index: usize, expected: String, found: String },
    OutOfRange { index: usize, field: &'static str, value: i64 },
    MissingAnswer { index: usize, field: &'static str },
    OutsideOpeningHours { index: usize, timestamp: i64 },
    OutsideWindow { index: usize, date: NaiveDate },
    DuplicateId { index: usize, first: usize, id: String },
    DayOrder { index: usize, date: NaiveDate, previous: NaiveDate },
}

impl Violation {
    pub fn index(&self) -> usize {
        match self {
            Violation::UnknownFragrance { index, .. }
            | Violation::SlotOutsideExhibition { index, .. }
            | Violation::MainNotInSlots { index, .. }
            | Violation::NameMismatch { index, .. }
            | Violation::OutOfRange { index, .. }
            | Violation::MissingAnswer { index, .. }
            | Violation::OutsideOpeningHours { index, .. }
            | Violation::OutsideWindow { index, .. }
            | Violation::DuplicateId { index, .. }
            | Violation::DayOrder { index, .. } => *index,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnknownFragrance { index, id } => {
                write!(f, "#{}: fragrance {} is not in the catalog", index, id)
            }
            Violation::SlotOutsideExhibition { index, exhibition, id } => {
                write!(f, "#{}: slot {} holds fragrance {} from another room", index, exhibition, id)
            }
            Violation::MainNotInSlots { index, id } => {
                write!(f, "#{}: main fragrance {} is not in any slot", index, id)
            }
            Violation::NameMismatch { index, expected, found } => {
                write!(f, "#{}: fragrance name {:?}, expected {:?}", index, found, expected)
            }
            Violation::OutOfRange { index, field, value } => {
                write!(f, "#{}: {} = {} is out of range", index, field, value)
            }
            Violation::MissingAnswer { index, field } => write!(f, "#{}: {} is missing", index, field),
            Violation::OutsideOpeningHours { index, timestamp } => {
                write!(f, "#{}: timestamp {} is outside opening hours", index, timestamp)
            }
            Violation::OutsideWindow { index, date } => {
                write!(f, "#{}: visit date {} is outside the operating window", index, date)
            }
            Violation::DuplicateId { index, first, id } => {
                write!(f, "#{}: id {} already used by #{}", index, id, first)
            }
            Violation::DayOrder { index, date, previous } => {
                write!(f, "#{}: visit date {} comes after {}", index, date, previous)
            }
        }
    }
}

/// Result of auditing an archive.
#[derive(Clone, Debug, Default)]
pub struct AuditReport {
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Archive Audit ===\n\n");
        s.push_str(&format!("  Records checked: {}\n", self.checked));
        s.push_str(&format!("  Violations:      {}\n", self.violations.len()));
        if !self.violations.is_empty() {
            s.push('\n');
            for v in &self.violations {
                s.push_str(&format!("  {}\n", v));
            }
        }
        s
    }
}

fn local_date(timestamp: i64, offset: &FixedOffset) -> Option<(NaiveDate, u32)> {
    let dt = offset.timestamp_millis_opt(timestamp).single()?;
    Some((dt.date_naive(), dt.hour()))
}

fn check_record(
    index: usize,
    r: &SurveyResponse,
    catalog: &Catalog,
    config: &ArchiveConfig,
    offset: &FixedOffset,
) -> Vec<Violation> {
    let mut out = Vec::new();

    match catalog.get(r.selected_fragrance_id) {
        Some(main) => {
            if main.name != r.fragrance_name {
                out.push(Violation::NameMismatch {
                    index,
                    expected: main.name.clone(),
                    found: r.fragrance_name.clone(),
                });
            }
        }
        None => out.push(Violation::UnknownFragrance { index, id: r.selected_fragrance_id }),
    }

    for (ex, field) in Exhibition::ALL.into_iter().zip(SLOT_FIELDS) {
        let Some(id) = r.slot(ex) else {
            out.push(Violation::MissingAnswer { index, field });
            continue;
        };
        match catalog.exhibition_of(id) {
            Some(room) if room == ex => {}
            Some(_) => out.push(Violation::SlotOutsideExhibition { index, exhibition: ex, id }),
            None => out.push(Violation::UnknownFragrance { index, id }),
        }
    }

    if r.emphasized_fragrance.is_none() {
        out.push(Violation::MissingAnswer { index, field: "emphasizedFragrance" });
    }
    if r.season.is_none() {
        out.push(Violation::MissingAnswer { index, field: "season" });
    }

    if !r.holds(r.selected_fragrance_id) {
        out.push(Violation::MainNotInSlots { index, id: r.selected_fragrance_id });
    }

    if !AGE_RANGE.contains(&r.age) {
        out.push(Violation::OutOfRange { index, field: "age", value: r.age as i64 });
    }
    match r.satisfaction {
        Some(score) if !SATISFACTION_RANGE.contains(&score) => {
            out.push(Violation::OutOfRange { index, field: "satisfaction", value: score as i64 });
        }
        Some(_) => {}
        None => out.push(Violation::MissingAnswer { index, field: "satisfaction" }),
    }

    match local_date(r.timestamp, offset) {
        Some((date, hour)) => {
            if !(config.opening_hour..config.closing_hour).contains(&hour) {
                out.push(Violation::OutsideOpeningHours { index, timestamp: r.timestamp });
            }
            if date < config.start_date || date > config.end_date {
                out.push(Violation::OutsideWindow { index, date });
            }
        }
        None => out.push(Violation::OutsideOpeningHours { index, timestamp: r.timestamp }),
    }

    out
}

/// Check every record against the catalog and the operating schedule.
pub fn audit(responses: &[SurveyResponse], catalog: &Catalog, config: &ArchiveConfig) -> Result<AuditReport> {
    let offset = config.offset()?;

    let mut violations: Vec<Violation> = responses
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, r)| check_record(i, r, catalog, config, &offset))
        .collect();

    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(responses.len());
    let mut previous: Option<NaiveDate> = None;
    for (index, r) in responses.iter().enumerate() {
        if let Some(first) = seen.insert(r.id.as_str(), index) {
            violations.push(Violation::DuplicateId { index, first, id: r.id.clone() });
        }
        if let Some((date, _)) = local_date(r.timestamp, &offset) {
            if let Some(prev) = previous {
                if date < prev {
                    violations.push(Violation::DayOrder { index, date, previous: prev });
                }
            }
            previous = Some(date);
        }
    }

    violations.sort_by_key(|v| v.index());

    if violations.is_empty() {
        debug!(records = responses.len(), "audit clean");
    } else {
        warn!(records = responses.len(), violations = violations.len(), "audit found violations");
    }

    Ok(AuditReport { checked: responses.len(), violations })
}

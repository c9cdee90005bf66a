//! Fragrance records, exhibition rooms and seasonal buckets.

use std::fmt;
use serde::{Serialize, Deserialize};

// =============================================================================
// EXHIBITION
// =============================================================================

/// One of the three exhibition rooms. Serialized as its room number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Exhibition {
    First = 1,
    Second = 2,
    Third = 3,
}

impl Exhibition {
    /// All rooms in visiting order.
    pub const ALL: [Exhibition; 3] = [Exhibition::First, Exhibition::Second, Exhibition::Third];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based slot index (room 1 -> 0).
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// The season whose fragrances are shown in this room.
    pub fn season(self) -> SeasonBucket {
        match self {
            Exhibition::First => SeasonBucket::SpringFall,
            Exhibition::Second => SeasonBucket::Summer,
            Exhibition::Third => SeasonBucket::Winter,
        }
    }

    /// The two rooms other than `self`, ascending.
    pub fn others(self) -> [Exhibition; 2] {
        match self {
            Exhibition::First => [Exhibition::Second, Exhibition::Third],
            Exhibition::Second => [Exhibition::First, Exhibition::Third],
            Exhibition::Third => [Exhibition::First, Exhibition::Second],
        }
    }
}

impl TryFrom<u8> for Exhibition {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Exhibition::First),
            2 => Ok(Exhibition::Second),
            3 => Ok(Exhibition::Third),
            other => Err(format!("exhibition must be 1, 2 or 3 (got {})", other)),
        }
    }
}

impl From<Exhibition> for u8 {
    fn from(exhibition: Exhibition) -> u8 {
        exhibition.number()
    }
}

impl fmt::Display for Exhibition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// =============================================================================
// SEASON BUCKET
// =============================================================================

/// Coarse season label used both for fragrances and for visit dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonBucket {
    #[serde(rename = "봄가을")]
    SpringFall,
    #[serde(rename = "여름")]
    Summer,
    #[serde(rename = "겨울")]
    Winter,
}

impl SeasonBucket {
    pub const ALL: [SeasonBucket; 3] = [SeasonBucket::SpringFall, SeasonBucket::Summer, SeasonBucket::Winter];

    /// Bucket of a visit month (1-12): May-Aug summer, Nov-Feb winter, the rest spring/fall.
    pub fn from_month(month: u32) -> Self {
        match month {
            5..=8 => SeasonBucket::Summer,
            11 | 12 | 1 | 2 => SeasonBucket::Winter,
            _ => SeasonBucket::SpringFall,
        }
    }

    /// The room that showcases this season.
    pub fn exhibition(self) -> Exhibition {
        match self {
            SeasonBucket::SpringFall => Exhibition::First,
            SeasonBucket::Summer => Exhibition::Second,
            SeasonBucket::Winter => Exhibition::Third,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeasonBucket::SpringFall => "봄가을",
            SeasonBucket::Summer => "여름",
            SeasonBucket::Winter => "겨울",
        }
    }
}

impl fmt::Display for SeasonBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// FRAGRANCE
// =============================================================================

/// A fragrance on display in one of the rooms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragrance {
    pub id: u32,
    pub name: String,
    /// Product label, e.g. "AC'SCENT 01".
    pub display_name: String,
    /// Main notes, most prominent first.
    pub notes: Vec<String>,
    pub exhibition: Exhibition,
    pub season_label: SeasonBucket,
}

impl Fragrance {
    /// Notes joined for display ("블랙베리, 베르가못").
    pub fn notes_label(&self) -> String {
        self.notes.join(", ")
    }
}

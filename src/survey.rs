//! Survey response record: the shape the kiosk stores and the dashboard reads.

use std::fmt;
use std::str::FromStr;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{Exhibition, MusicGenre, SeasonBucket};
use crate::error::ArchiveError;

/// Visitor gender as asked at intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "남성")]
    Male,
    #[serde(rename = "여성")]
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Blend ratio between the emphasized fragrance and the other two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FragranceRatio {
    #[serde(rename = "60/20/20")]
    Bold,
    #[serde(rename = "40/30/30")]
    Balanced,
}

impl FragranceRatio {
    pub fn label(self) -> &'static str {
        match self {
            FragranceRatio::Bold => "60/20/20",
            FragranceRatio::Balanced => "40/30/30",
        }
    }
}

impl fmt::Display for FragranceRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One stored survey record.
///
/// Field names serialize in camelCase; that JSON shape is what the storage
/// blob and the dashboard expect. The kiosk leaves the room picks, the
/// emphasized room and the rating out when the visitor skipped them, and
/// writes an empty season when the emphasized room has no pick. Generated
/// records always carry every field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: String,
    pub age: u32,
    pub gender: Gender,
    /// The visitor's main fragrance; always one of the three slots.
    pub selected_fragrance_id: u32,
    pub fragrance_name: String,
    /// Season bucket the main fragrance was sampled under.
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub season: Option<SeasonBucket>,
    pub music_genre: MusicGenre,
    pub fragrance_ratio: FragranceRatio,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasized_fragrance: Option<Exhibition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_fragrance1: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_fragrance2: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_fragrance3: Option<u32>,
    /// 1-5; generated records only use 3-5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction: Option<u8>,
    /// Milliseconds since the Unix epoch. Fractional values are floored on read.
    #[serde(deserialize_with = "floor_millis")]
    pub timestamp: i64,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<SeasonBucket>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    match label.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => SeasonBucket::ALL
            .into_iter()
            .find(|s| s.label() == label)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown season '{}'", label))),
    }
}

fn floor_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = f64::deserialize(deserializer)?;
    if !millis.is_finite() {
        return Err(D::Error::custom("timestamp is not a finite number"));
    }
    Ok(millis.floor() as i64)
}

impl SurveyResponse {
    /// The fragrance id chosen in a given room, if any.
    pub fn slot(&self, exhibition: Exhibition) -> Option<u32> {
        match exhibition {
            Exhibition::First => self.selected_fragrance1,
            Exhibition::Second => self.selected_fragrance2,
            Exhibition::Third => self.selected_fragrance3,
        }
    }

    pub fn slots(&self) -> [Option<u32>; 3] {
        [self.selected_fragrance1, self.selected_fragrance2, self.selected_fragrance3]
    }

    /// Whether `id` sits in one of the three slots.
    pub fn holds(&self, id: u32) -> bool {
        self.slots().contains(&Some(id))
    }

    /// Fragrance id in the emphasized slot.
    pub fn emphasized_fragrance_id(&self) -> Option<u32> {
        self.slot(self.emphasized_fragrance?)
    }

    pub fn age_group(&self) -> AgeGroup {
        AgeGroup::of(self.age)
    }
}

// =============================================================================
// AGE GROUPS
// =============================================================================

/// Dashboard age bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "10대")]
    Teens,
    #[serde(rename = "20대")]
    Twenties,
    #[serde(rename = "30대")]
    Thirties,
    #[serde(rename = "40대")]
    Forties,
    #[serde(rename = "50대 이상")]
    FiftiesPlus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Teens,
        AgeGroup::Twenties,
        AgeGroup::Thirties,
        AgeGroup::Forties,
        AgeGroup::FiftiesPlus,
    ];

    pub fn of(age: u32) -> Self {
        match age {
            0..=19 => AgeGroup::Teens,
            20..=29 => AgeGroup::Twenties,
            30..=39 => AgeGroup::Thirties,
            40..=49 => AgeGroup::Forties,
            _ => AgeGroup::FiftiesPlus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Teens => "10대",
            AgeGroup::Twenties => "20대",
            AgeGroup::Thirties => "30대",
            AgeGroup::Forties => "40대",
            AgeGroup::FiftiesPlus => "50대 이상",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|g| g.label() == s.trim())
            .ok_or_else(|| ArchiveError::UnknownLabel { kind: "age group", value: s.to_string() })
    }
}

//! Kiosk sessions: a visitor's answers before they become stored records.
//!
//! The kiosk stores one record per room the visitor picked a fragrance in.
//! All records of a session share the visitor's answers, the picks of every
//! room and the season of the emphasized room's fragrance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Exhibition, MusicGenre};
use crate::error::{ArchiveError, Result};
use crate::survey::{FragranceRatio, Gender, SurveyResponse};

/// The fragrance and music picked in one room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomChoice {
    pub fragrance_id: u32,
    pub music_genre: MusicGenre,
}

/// Everything a visitor answered at the kiosk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskSession {
    pub age: u32,
    pub gender: Gender,
    /// Rooms 1, 2, 3; `None` for a room the visitor skipped.
    pub rooms: [Option<RoomChoice>; 3],
    pub fragrance_ratio: FragranceRatio,
    pub emphasized_fragrance: Exhibition,
    /// Star rating; 0 or absent means the visitor did not rate.
    #[serde(default)]
    pub satisfaction: Option<u8>,
}

impl KioskSession {
    /// Read a session from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ArchiveError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| ArchiveError::json(path, e))
    }

    pub fn choice(&self, exhibition: Exhibition) -> Option<&RoomChoice> {
        self.rooms[exhibition.index()].as_ref()
    }

    fn pick(&self, exhibition: Exhibition) -> Option<u32> {
        self.choice(exhibition).map(|c| c.fragrance_id)
    }

    /// Build the records to store, stamped `now` (epoch milliseconds).
    ///
    /// Record ids are `{now}-{room}`. A session with no picks yields no records.
    pub fn to_responses(&self, catalog: &Catalog, now: i64) -> Result<Vec<SurveyResponse>> {
        for ex in Exhibition::ALL {
            if let Some(id) = self.pick(ex) {
                if catalog.exhibition_of(id) != Some(ex) {
                    return Err(ArchiveError::InvalidSession(format!(
                        "fragrance {} is not shown in exhibition {}",
                        id, ex,
                    )));
                }
            }
        }
        let satisfaction = match self.satisfaction {
            None | Some(0) => None,
            Some(score @ 1..=5) => Some(score),
            Some(score) => {
                return Err(ArchiveError::InvalidSession(format!("satisfaction {} is not 1-5", score)));
            }
        };

        let season = self
            .pick(self.emphasized_fragrance)
            .and_then(|id| catalog.get(id))
            .map(|f| f.season_label);

        let responses = Exhibition::ALL
            .into_iter()
            .filter_map(|ex| self.choice(ex).map(|choice| (ex, choice)))
            .map(|(ex, choice)| SurveyResponse {
                id: format!("{}-{}", now, ex.number()),
                age: self.age,
                gender: self.gender,
                selected_fragrance_id: choice.fragrance_id,
                fragrance_name: catalog
                    .get(choice.fragrance_id)
                    .map(|f| f.name.clone())
                    .unwrap_or_default(),
                season,
                music_genre: choice.music_genre,
                fragrance_ratio: self.fragrance_ratio,
                emphasized_fragrance: Some(self.emphasized_fragrance),
                selected_fragrance1: self.pick(Exhibition::First),
                selected_fragrance2: self.pick(Exhibition::Second),
                selected_fragrance3: self.pick(Exhibition::Third),
                satisfaction,
                timestamp: now,
            })
            .collect();
        Ok(responses)
    }
}

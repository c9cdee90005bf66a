//! Fragrance and music catalog shown at the exhibition.
//!
//! The fragrance list is embedded in the binary via `include_str!`; an
//! optional directory containing `fragrances.json` can replace it. Every
//! catalog is validated on load so the generator can rely on its shape:
//! 30 unique ids, 10 per room, each room's season label fixed.

pub mod fragrance;
pub mod genre;

use std::collections::HashSet;
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::error::{ArchiveError, Result};

pub use fragrance::{Exhibition, Fragrance, SeasonBucket};
pub use genre::MusicGenre;

const DEFAULT_FRAGRANCES_JSON: &str = include_str!("../../data/defaults/fragrances.json");

/// Fragrances per exhibition room.
pub const FRAGRANCES_PER_EXHIBITION: usize = 10;

/// Fragrance ids run from 1 to this value.
pub const TOTAL_FRAGRANCES: usize = FRAGRANCES_PER_EXHIBITION * 3;

/// Container for deserializing the fragrances JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FragrancesFile {
    pub fragrances: Vec<Fragrance>,
}

/// Read-only fragrance registry, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Catalog {
    fragrances: Vec<Fragrance>,
    /// Fragrance ids per room, in file order.
    groups: [Vec<u32>; 3],
}

impl Catalog {
    /// Load from the defaults compiled into the binary.
    pub fn defaults() -> Self {
        let file: FragrancesFile = serde_json::from_str(DEFAULT_FRAGRANCES_JSON)
            .expect("Failed to parse embedded fragrances.json");
        Self::from_fragrances(file.fragrances)
            .expect("Embedded fragrances.json violates catalog invariants")
    }

    /// Load `fragrances.json` from a directory, falling back to the defaults
    /// when the directory has none.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join("fragrances.json");
        if !path.exists() {
            return Ok(Self::defaults());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| ArchiveError::io(&path, e))?;
        let file: FragrancesFile =
            serde_json::from_str(&contents).map_err(|e| ArchiveError::json(&path, e))?;
        let catalog = Self::from_fragrances(file.fragrances)?;
        info!(path = %path.display(), "loaded fragrance catalog override");
        Ok(catalog)
    }

    /// Build a catalog from a fragrance list, checking its invariants.
    pub fn from_fragrances(fragrances: Vec<Fragrance>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut groups: [Vec<u32>; 3] = Default::default();

        for frag in &fragrances {
            if !(1..=TOTAL_FRAGRANCES as u32).contains(&frag.id) {
                return Err(ArchiveError::InvalidCatalog(format!(
                    "fragrance id {} outside 1..={}",
                    frag.id, TOTAL_FRAGRANCES,
                )));
            }
            if !seen.insert(frag.id) {
                return Err(ArchiveError::InvalidCatalog(format!("duplicate fragrance id {}", frag.id)));
            }
            if frag.season_label != frag.exhibition.season() {
                return Err(ArchiveError::InvalidCatalog(format!(
                    "fragrance {} is in exhibition {} but labelled {}",
                    frag.id, frag.exhibition, frag.season_label,
                )));
            }
            groups[frag.exhibition.index()].push(frag.id);
        }

        for ex in Exhibition::ALL {
            let size = groups[ex.index()].len();
            if size != FRAGRANCES_PER_EXHIBITION {
                return Err(ArchiveError::InvalidCatalog(format!(
                    "exhibition {} has {} fragrances, expected {}",
                    ex, size, FRAGRANCES_PER_EXHIBITION,
                )));
            }
        }

        Ok(Self { fragrances, groups })
    }

    pub fn fragrances(&self) -> &[Fragrance] {
        &self.fragrances
    }

    pub fn get(&self, id: u32) -> Option<&Fragrance> {
        self.fragrances.iter().find(|f| f.id == id)
    }

    /// Ids of the fragrances shown in a room, in catalog order.
    pub fn group(&self, exhibition: Exhibition) -> &[u32] {
        &self.groups[exhibition.index()]
    }

    /// Room of a fragrance id, if the id exists.
    pub fn exhibition_of(&self, id: u32) -> Option<Exhibition> {
        self.get(id).map(|f| f.exhibition)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::defaults()
    }
}

//! Weighted samplers that turn draws into visitor answers.
//!
//! Each sampler takes its draws from the shared source in a fixed order;
//! the number of draws a sampler consumes is part of its contract.

use crate::catalog::{Catalog, Exhibition, MusicGenre, SeasonBucket};
use crate::random::DrawSource;
use crate::survey::{FragranceRatio, Gender};

// =============================================================================
// TABLES
// =============================================================================

/// Cumulative threshold, first age, bracket width.
const AGE_BRACKETS: [(f64, u32, u32); 5] = [
    (0.02, 18, 2),
    (0.52, 20, 8),
    (0.77, 28, 3),
    (0.92, 31, 5),
    (1.0, 36, 20),
];

const MALE_SHARE: f64 = 0.38;

/// Genre weights in scan order. Sums to 1.0.
pub const GENRE_WEIGHTS: [(MusicGenre, f64); 11] = [
    (MusicGenre::Indie, 0.20),
    (MusicGenre::KPop, 0.18),
    (MusicGenre::Pop, 0.15),
    (MusicGenre::HipHop, 0.12),
    (MusicGenre::RnB, 0.10),
    (MusicGenre::Rock, 0.08),
    (MusicGenre::Ballad, 0.07),
    (MusicGenre::Jazz, 0.04),
    (MusicGenre::Classical, 0.03),
    (MusicGenre::Electronic, 0.02),
    (MusicGenre::Other, 0.01),
];

const BOLD_RATIO_SHARE: f64 = 0.6;

/// Best sellers picked outright before any seasonal reasoning:
/// cumulative threshold, fragrance id.
const POPULAR_FRAGRANCES: [(f64, u32); 3] = [(0.11, 19), (0.18, 2), (0.24, 24)];

/// Chance the seasonal phase keeps the room matching the visit season.
const SEASONAL_PREFERENCE: f64 = 0.80;

/// Chance the emphasized slot is the main fragrance's own room.
const EMPHASIZE_MAIN: f64 = 0.80;

/// Cumulative threshold, score.
const SATISFACTION_LEVELS: [(f64, u8); 2] = [(0.85, 5), (0.98, 4)];
const LOWEST_GENERATED_SATISFACTION: u8 = 3;

// =============================================================================
// HELPERS
// =============================================================================

/// `floor(draw * len)`, clamped into range. One draw.
pub fn uniform_index(rng: &mut impl DrawSource, len: usize) -> usize {
    let idx = (rng.draw() * len as f64).floor() as usize;
    idx.min(len.saturating_sub(1))
}

// =============================================================================
// DEMOGRAPHICS
// =============================================================================

/// Age between 18 and 55, mean about 28. Two draws.
pub fn sample_age(rng: &mut impl DrawSource) -> u32 {
    let roll = rng.draw();
    let (_, first, width) = AGE_BRACKETS
        .iter()
        .copied()
        .find(|(threshold, _, _)| roll < *threshold)
        .unwrap_or(AGE_BRACKETS[AGE_BRACKETS.len() - 1]);
    first + (rng.draw() * width as f64).floor() as u32
}

/// 38% male, 62% female. One draw.
pub fn sample_gender(rng: &mut impl DrawSource) -> Gender {
    if rng.draw() < MALE_SHARE {
        Gender::Male
    } else {
        Gender::Female
    }
}

// =============================================================================
// PREFERENCES
// =============================================================================

/// Weighted genre pick; falls back to `Other` if the scan runs off the end. One draw.
pub fn sample_music_genre(rng: &mut impl DrawSource) -> MusicGenre {
    let roll = rng.draw();
    let mut cumulative = 0.0;
    for (genre, weight) in GENRE_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return genre;
        }
    }
    MusicGenre::Other
}

/// One draw.
pub fn sample_ratio(rng: &mut impl DrawSource) -> FragranceRatio {
    if rng.draw() < BOLD_RATIO_SHARE {
        FragranceRatio::Bold
    } else {
        FragranceRatio::Balanced
    }
}

/// 5 (85%), 4 (13%), 3 (2%). One draw.
pub fn sample_satisfaction(rng: &mut impl DrawSource) -> u8 {
    let roll = rng.draw();
    SATISFACTION_LEVELS
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(LOWEST_GENERATED_SATISFACTION)
}

// =============================================================================
// FRAGRANCES
// =============================================================================

/// One uniformly chosen fragrance per room, rooms 1, 2, 3 in order. Three draws.
pub fn pick_per_exhibition(rng: &mut impl DrawSource, catalog: &Catalog) -> [u32; 3] {
    let mut picks = [0; 3];
    for ex in Exhibition::ALL {
        let group = catalog.group(ex);
        picks[ex.index()] = group[uniform_index(rng, group.len())];
    }
    picks
}

/// The fragrance a visitor leans towards most.
#[derive(Clone, Debug, PartialEq)]
pub struct MainFragrance {
    pub id: u32,
    pub name: String,
    pub exhibition: Exhibition,
    /// Season the choice was made under: the fragrance's own label for a
    /// best seller, the visit's season bucket otherwise.
    pub season: SeasonBucket,
}

/// Pick the main fragrance for a visit in `month` given the three room picks.
///
/// One draw decides whether a best seller wins outright. Otherwise a second
/// draw keeps the pick from the room matching the visit's season (80%),
/// and only when it does not, a third draw chooses between the other two
/// rooms' picks.
pub fn sample_main_fragrance(
    rng: &mut impl DrawSource,
    catalog: &Catalog,
    month: u32,
    selected: &[u32; 3],
) -> MainFragrance {
    let roll = rng.draw();
    if let Some((_, id)) = POPULAR_FRAGRANCES.iter().find(|(threshold, _)| roll < *threshold) {
        // A validated catalog always holds ids 1-30; an override that does
        // not falls through to the seasonal phase.
        if let Some(frag) = catalog.get(*id) {
            return MainFragrance {
                id: frag.id,
                name: frag.name.clone(),
                exhibition: frag.exhibition,
                season: frag.season_label,
            };
        }
    }

    let season = SeasonBucket::from_month(month);
    let preferred = season.exhibition();
    let chosen_room = if rng.draw() < SEASONAL_PREFERENCE {
        preferred
    } else {
        let others = preferred.others();
        others[uniform_index(rng, others.len())]
    };

    let id = selected[chosen_room.index()];
    let name = catalog.get(id).map(|f| f.name.clone()).unwrap_or_default();
    MainFragrance { id, name, exhibition: chosen_room, season }
}

/// Which room's fragrance the visitor emphasizes. One draw, plus a second
/// only when the main fragrance's room is not kept.
pub fn sample_emphasized(rng: &mut impl DrawSource, main: Exhibition) -> Exhibition {
    if rng.draw() < EMPHASIZE_MAIN {
        return main;
    }
    let others = main.others();
    others[uniform_index(rng, others.len())]
}

/// Record id suffix: characters 2..11 of the draw's shortest decimal form
/// ("0.014064643347" -> "014064643"). One draw, taken by the caller.
pub fn id_suffix(draw: f64) -> String {
    draw.to_string().chars().skip(2).take(9).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedDraws, SeededRandom};
    use proptest::prelude::*;

    #[test]
    fn test_age_brackets() {
        let mut d = ScriptedDraws::new(&[0.01, 0.99]);
        assert_eq!(sample_age(&mut d), 19);
        assert_eq!(d.taken, 2);

        let mut d = ScriptedDraws::new(&[0.02, 0.0]);
        assert_eq!(sample_age(&mut d), 20);

        let mut d = ScriptedDraws::new(&[0.6, 0.5]);
        assert_eq!(sample_age(&mut d), 29);

        let mut d = ScriptedDraws::new(&[0.9, 0.99]);
        assert_eq!(sample_age(&mut d), 35);

        let mut d = ScriptedDraws::new(&[0.95, 0.999]);
        assert_eq!(sample_age(&mut d), 55);
    }

    #[test]
    fn test_gender_split() {
        assert_eq!(sample_gender(&mut ScriptedDraws::new(&[0.379])), Gender::Male);
        assert_eq!(sample_gender(&mut ScriptedDraws::new(&[0.38])), Gender::Female);
    }

    #[test]
    fn test_genre_scan() {
        assert_eq!(sample_music_genre(&mut ScriptedDraws::new(&[0.0])), MusicGenre::Indie);
        assert_eq!(sample_music_genre(&mut ScriptedDraws::new(&[0.2])), MusicGenre::KPop);
        assert_eq!(sample_music_genre(&mut ScriptedDraws::new(&[0.5])), MusicGenre::HipHop);
        assert_eq!(sample_music_genre(&mut ScriptedDraws::new(&[0.975])), MusicGenre::Electronic);
        assert_eq!(sample_music_genre(&mut ScriptedDraws::new(&[0.995])), MusicGenre::Other);
    }

    #[test]
    fn test_genre_weights_sum_to_one() {
        let total: f64 = GENRE_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_and_satisfaction() {
        assert_eq!(sample_ratio(&mut ScriptedDraws::new(&[0.59])), FragranceRatio::Bold);
        assert_eq!(sample_ratio(&mut ScriptedDraws::new(&[0.6])), FragranceRatio::Balanced);
        assert_eq!(sample_satisfaction(&mut ScriptedDraws::new(&[0.84])), 5);
        assert_eq!(sample_satisfaction(&mut ScriptedDraws::new(&[0.85])), 4);
        assert_eq!(sample_satisfaction(&mut ScriptedDraws::new(&[0.98])), 3);
    }

    #[test]
    fn test_pick_per_exhibition_order() {
        let catalog = Catalog::defaults();
        let mut d = ScriptedDraws::new(&[0.0, 0.55, 0.99]);
        assert_eq!(pick_per_exhibition(&mut d, &catalog), [1, 16, 30]);
        assert_eq!(d.taken, 3);
    }

    #[test]
    fn test_main_fragrance_best_sellers() {
        let catalog = Catalog::defaults();
        let selected = [4, 13, 25];

        let mut d = ScriptedDraws::new(&[0.05]);
        let main = sample_main_fragrance(&mut d, &catalog, 1, &selected);
        assert_eq!(main.id, 19);
        assert_eq!(main.exhibition, Exhibition::Second);
        // Keeps its own label even in a winter month.
        assert_eq!(main.season, SeasonBucket::Summer);
        assert_eq!(d.taken, 1);

        let mut d = ScriptedDraws::new(&[0.15]);
        assert_eq!(sample_main_fragrance(&mut d, &catalog, 1, &selected).id, 2);

        let mut d = ScriptedDraws::new(&[0.2]);
        assert_eq!(sample_main_fragrance(&mut d, &catalog, 1, &selected).id, 24);
    }

    #[test]
    fn test_main_fragrance_seasonal_preference() {
        let catalog = Catalog::defaults();
        let selected = [4, 13, 25];

        // July, preference kept: room 2's pick, two draws.
        let mut d = ScriptedDraws::new(&[0.5, 0.1]);
        let main = sample_main_fragrance(&mut d, &catalog, 7, &selected);
        assert_eq!(main.id, 13);
        assert_eq!(main.name, "태식");
        assert_eq!(main.season, SeasonBucket::Summer);
        assert_eq!(d.taken, 2);

        // March, preference dropped: third draw picks among rooms 2 and 3.
        let mut d = ScriptedDraws::new(&[0.5, 0.9, 0.7]);
        let main = sample_main_fragrance(&mut d, &catalog, 3, &selected);
        assert_eq!(main.id, 25);
        assert_eq!(main.exhibition, Exhibition::Third);
        assert_eq!(main.season, SeasonBucket::SpringFall);
        assert_eq!(d.taken, 3);
    }

    #[test]
    fn test_emphasized_draw_count() {
        let mut d = ScriptedDraws::new(&[0.79]);
        assert_eq!(sample_emphasized(&mut d, Exhibition::Second), Exhibition::Second);
        assert_eq!(d.taken, 1);

        let mut d = ScriptedDraws::new(&[0.8, 0.4]);
        assert_eq!(sample_emphasized(&mut d, Exhibition::Second), Exhibition::First);
        assert_eq!(d.taken, 2);

        let mut d = ScriptedDraws::new(&[0.9, 0.6]);
        assert_eq!(sample_emphasized(&mut d, Exhibition::First), Exhibition::Third);
    }

    #[test]
    fn test_id_suffix() {
        assert_eq!(id_suffix(0.014064643347050754), "014064643");
        assert_eq!(id_suffix(0.5), "5");
        assert_eq!(id_suffix(0.0), "");
    }

    proptest! {
        #[test]
        fn prop_samplers_stay_in_range(seed in 0u64..233_280) {
            let catalog = Catalog::defaults();
            let mut rng = SeededRandom::new(seed);
            for _ in 0..50 {
                let age = sample_age(&mut rng);
                prop_assert!((18..=55).contains(&age));
                prop_assert!((3..=5).contains(&sample_satisfaction(&mut rng)));

                let picks = pick_per_exhibition(&mut rng, &catalog);
                for ex in Exhibition::ALL {
                    prop_assert_eq!(catalog.exhibition_of(picks[ex.index()]), Some(ex));
                }
                let main = sample_main_fragrance(&mut rng, &catalog, 1 + (seed % 12) as u32, &picks);
                prop_assert_eq!(catalog.exhibition_of(main.id), Some(main.exhibition));
            }
        }
    }
}

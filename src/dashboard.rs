//! Dashboard statistics over stored responses.
//!
//! Descriptive counts and shares only: what the admin page charts. An
//! optional age-group filter narrows every figure except the age-group
//! table itself, which always covers all responses.

use serde::Serialize;

use crate::catalog::{Catalog, MusicGenre, SeasonBucket};
use crate::survey::{AgeGroup, FragranceRatio, Gender, SurveyResponse};

/// Fragrances listed in the fragrance x genre table.
const MATRIX_FRAGRANCES: usize = 10;
/// Genres listed per fragrance in that table.
const MATRIX_GENRES: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FragranceStat {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenreStat {
    pub genre: MusicGenre,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgeGroupStat {
    pub group: AgeGroup,
    pub count: usize,
    pub average_age: f64,
}

/// Most common genres among visitors whose main fragrance is `id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FragranceGenres {
    pub id: u32,
    pub display_name: String,
    pub name: String,
    pub top_genres: Vec<(MusicGenre, usize)>,
}

/// Everything the admin dashboard shows.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardSummary {
    pub filter: Option<AgeGroup>,
    pub total: usize,
    /// All fragrances, most chosen first.
    pub fragrances: Vec<FragranceStat>,
    /// Genres that appear at least once, most chosen first.
    pub genres: Vec<GenreStat>,
    pub seasons: Vec<(SeasonBucket, usize)>,
    pub ratios: Vec<(FragranceRatio, usize)>,
    pub genders: Vec<(Gender, usize)>,
    /// Fragrances in the emphasized slot, count > 0 only.
    pub emphasized: Vec<FragranceStat>,
    pub average_satisfaction: f64,
    /// Counts for scores 1 through 5.
    pub satisfaction_histogram: [usize; 5],
    pub average_age: f64,
    pub age_groups: Vec<AgeGroupStat>,
    pub fragrance_genres: Vec<FragranceGenres>,
    /// Size of the filtered responses as a JSON blob.
    pub serialized_bytes: usize,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Count occurrences in first-seen order, then sort by count (stable).
fn ranked_genres<'a>(responses: impl Iterator<Item = &'a SurveyResponse>) -> Vec<(MusicGenre, usize)> {
    let mut counts: Vec<(MusicGenre, usize)> = Vec::new();
    for r in responses {
        match counts.iter_mut().find(|(g, _)| *g == r.music_genre) {
            Some((_, n)) => *n += 1,
            None => counts.push((r.music_genre, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

impl DashboardSummary {
    pub fn compute(responses: &[SurveyResponse], catalog: &Catalog, filter: Option<AgeGroup>) -> Self {
        let filtered: Vec<&SurveyResponse> = responses
            .iter()
            .filter(|r| filter.map_or(true, |g| r.age_group() == g))
            .collect();
        let total = filtered.len();

        let fragrance_stat = |id: u32, count: usize| {
            let frag = catalog.get(id);
            FragranceStat {
                id,
                name: frag.map(|f| f.name.clone()).unwrap_or_default(),
                display_name: frag.map(|f| f.display_name.clone()).unwrap_or_default(),
                count,
                percentage: percentage(count, total),
            }
        };

        let mut fragrances: Vec<FragranceStat> = catalog
            .fragrances()
            .iter()
            .map(|f| {
                let count = filtered.iter().filter(|r| r.selected_fragrance_id == f.id).count();
                fragrance_stat(f.id, count)
            })
            .collect();
        fragrances.sort_by(|a, b| b.count.cmp(&a.count));

        let genres = ranked_genres(filtered.iter().copied())
            .into_iter()
            .map(|(genre, count)| GenreStat { genre, count, percentage: percentage(count, total) })
            .collect();

        let seasons = SeasonBucket::ALL
            .iter()
            .map(|s| (*s, filtered.iter().filter(|r| r.season == Some(*s)).count()))
            .collect();
        let ratios = [FragranceRatio::Bold, FragranceRatio::Balanced]
            .iter()
            .map(|q| (*q, filtered.iter().filter(|r| r.fragrance_ratio == *q).count()))
            .collect();
        let genders = [Gender::Male, Gender::Female]
            .iter()
            .map(|g| (*g, filtered.iter().filter(|r| r.gender == *g).count()))
            .collect();

        let mut emphasized: Vec<FragranceStat> = catalog
            .fragrances()
            .iter()
            .map(|f| {
                let count = filtered.iter().filter(|r| r.emphasized_fragrance_id() == Some(f.id)).count();
                fragrance_stat(f.id, count)
            })
            .filter(|s| s.count > 0)
            .collect();
        emphasized.sort_by(|a, b| b.count.cmp(&a.count));

        let mut satisfaction_histogram = [0usize; 5];
        let mut satisfaction_sum = 0.0;
        let mut rated = 0;
        for score in filtered.iter().filter_map(|r| r.satisfaction) {
            if (1..=5).contains(&score) {
                satisfaction_histogram[score as usize - 1] += 1;
                satisfaction_sum += score as f64;
                rated += 1;
            }
        }

        let average_age = average(filtered.iter().map(|r| r.age as f64).sum(), total);

        let age_groups = AgeGroup::ALL
            .iter()
            .map(|group| {
                let ages: Vec<u32> = responses.iter().filter(|r| r.age_group() == *group).map(|r| r.age).collect();
                AgeGroupStat {
                    group: *group,
                    count: ages.len(),
                    average_age: average(ages.iter().map(|a| *a as f64).sum(), ages.len()),
                }
            })
            .collect();

        let fragrance_genres = fragrances
            .iter()
            .take(MATRIX_FRAGRANCES)
            .map(|stat| {
                let mut top = ranked_genres(filtered.iter().copied().filter(|r| r.selected_fragrance_id == stat.id));
                top.truncate(MATRIX_GENRES);
                FragranceGenres {
                    id: stat.id,
                    display_name: stat.display_name.clone(),
                    name: stat.name.clone(),
                    top_genres: top,
                }
            })
            .collect();

        let serialized_bytes = serde_json::to_string(&filtered).map(|s| s.len()).unwrap_or(0);

        Self {
            filter,
            total,
            fragrances,
            genres,
            seasons,
            ratios,
            genders,
            emphasized,
            average_satisfaction: average(satisfaction_sum, rated),
            satisfaction_histogram,
            average_age,
            age_groups,
            fragrance_genres,
            serialized_bytes,
        }
    }

    /// Share of a gender among the filtered responses, in percent.
    pub fn gender_share(&self, gender: Gender) -> f64 {
        let count = self.genders.iter().find(|(g, _)| *g == gender).map_or(0, |(_, n)| *n);
        percentage(count, self.total)
    }

    /// Headline figures: count, blob size, mean age and rating, gender split.
    pub fn overview(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("  Responses:              {}\n", self.total));
        s.push_str(&format!(
            "  Size:                   {:.2} KB ({:.2} MB)\n",
            self.serialized_bytes as f64 / 1024.0,
            self.serialized_bytes as f64 / 1024.0 / 1024.0,
        ));
        s.push_str(&format!("  Average age:            {:.1}\n", self.average_age));
        s.push_str(&format!("  Average satisfaction:   {:.2}\n", self.average_satisfaction));
        s.push_str(&format!(
            "  Gender:                 남 {:.1}% / 여 {:.1}%\n",
            self.gender_share(Gender::Male),
            self.gender_share(Gender::Female),
        ));
        s
    }

    /// Plain-text report.
    pub fn report(&self) -> String {
        let mut s = String::new();
        let scope = self.filter.map_or("전체".to_string(), |g| g.label().to_string());
        s.push_str(&format!("=== Survey Dashboard ({}) ===\n\n", scope));
        s.push_str(&self.overview());
        s.push('\n');

        s.push_str("--- Fragrances ---\n");
        for f in self.fragrances.iter().filter(|f| f.count > 0) {
            s.push_str(&format!("  {} {:<16} {:>6} ({:.1}%)\n", f.display_name, f.name, f.count, f.percentage));
        }

        s.push_str("\n--- Music Genres ---\n");
        for g in &self.genres {
            s.push_str(&format!("  {:<16} {:>6} ({:.1}%)\n", g.genre.label(), g.count, g.percentage));
        }

        s.push_str("\n--- Seasons ---\n");
        for (season, count) in &self.seasons {
            s.push_str(&format!("  {:<8} {:>6} ({:.1}%)\n", season.label(), count, percentage(*count, self.total)));
        }

        s.push_str("\n--- Ratios ---\n");
        for (ratio, count) in &self.ratios {
            s.push_str(&format!("  {:<8} {:>6} ({:.1}%)\n", ratio.label(), count, percentage(*count, self.total)));
        }

        s.push_str("\n--- Emphasized Fragrances ---\n");
        for f in &self.emphasized {
            s.push_str(&format!("  {} {:<16} {:>6} ({:.1}%)\n", f.display_name, f.name, f.count, f.percentage));
        }

        s.push_str("\n--- Satisfaction ---\n");
        let rated: usize = self.satisfaction_histogram.iter().sum();
        for (i, count) in self.satisfaction_histogram.iter().enumerate().rev() {
            s.push_str(&format!("  {}점 {:>6} ({:.1}%)\n", i + 1, count, percentage(*count, rated)));
        }

        s.push_str("\n--- Age Groups (all responses) ---\n");
        for g in &self.age_groups {
            s.push_str(&format!("  {:<8} {:>6}  avg {:.1}\n", g.group.label(), g.count, g.average_age));
        }

        s.push_str("\n--- Fragrance x Genre ---\n");
        for row in &self.fragrance_genres {
            let genres: Vec<String> = row.top_genres.iter().map(|(g, n)| format!("{} {}", g.label(), n)).collect();
            s.push_str(&format!("  {} {}: {}\n", row.display_name, row.name, genres.join(", ")));
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Exhibition;
    use crate::generator::generate_archive;

    fn response(id: &str, age: u32, main: u32, slots: [u32; 3], emphasized: Exhibition, genre: MusicGenre) -> SurveyResponse {
        SurveyResponse {
            id: id.to_string(),
            age,
            gender: if age % 2 == 0 { Gender::Female } else { Gender::Male },
            selected_fragrance_id: main,
            fragrance_name: String::new(),
            season: Some(SeasonBucket::Summer),
            music_genre: genre,
            fragrance_ratio: FragranceRatio::Bold,
            emphasized_fragrance: Some(emphasized),
            selected_fragrance1: Some(slots[0]),
            selected_fragrance2: Some(slots[1]),
            selected_fragrance3: Some(slots[2]),
            satisfaction: Some(4),
            timestamp: 0,
        }
    }

    fn fixture() -> Vec<SurveyResponse> {
        vec![
            response("a", 22, 19, [1, 19, 21], Exhibition::Second, MusicGenre::Jazz),
            response("b", 25, 19, [2, 19, 22], Exhibition::First, MusicGenre::Indie),
            response("c", 33, 2, [2, 11, 23], Exhibition::First, MusicGenre::Indie),
            response("d", 51, 24, [3, 12, 24], Exhibition::Third, MusicGenre::Jazz),
        ]
    }

    #[test]
    fn test_counts_and_ordering() {
        let catalog = Catalog::defaults();
        let summary = DashboardSummary::compute(&fixture(), &catalog, None);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.fragrances.len(), 30);
        assert_eq!(summary.fragrances[0].id, 19);
        assert_eq!(summary.fragrances[0].count, 2);
        assert_eq!(summary.fragrances[0].percentage, 50.0);
        // Ties keep catalog order.
        assert_eq!(summary.fragrances[1].id, 2);
        assert_eq!(summary.fragrances[2].id, 24);

        // Jazz seen first, tie with Indie keeps that order.
        assert_eq!(summary.genres[0].genre, MusicGenre::Jazz);
        assert_eq!(summary.genres[1].genre, MusicGenre::Indie);
        assert_eq!(summary.genres.len(), 2);
    }

    #[test]
    fn test_emphasized_uses_slot() {
        let catalog = Catalog::defaults();
        let summary = DashboardSummary::compute(&fixture(), &catalog, None);
        let ids: Vec<(u32, usize)> = summary.emphasized.iter().map(|s| (s.id, s.count)).collect();
        assert_eq!(ids, vec![(2, 2), (19, 1), (24, 1)]);
    }

    #[test]
    fn test_age_filter() {
        let catalog = Catalog::defaults();
        let summary = DashboardSummary::compute(&fixture(), &catalog, Some(AgeGroup::Twenties));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.average_age, 23.5);
        // Age table ignores the filter.
        let counts: Vec<usize> = summary.age_groups.iter().map(|g| g.count).collect();
        assert_eq!(counts, vec![0, 2, 1, 0, 1]);
    }

    #[test]
    fn test_satisfaction() {
        let catalog = Catalog::defaults();
        let summary = DashboardSummary::compute(&fixture(), &catalog, None);
        assert_eq!(summary.average_satisfaction, 4.0);
        assert_eq!(summary.satisfaction_histogram, [0, 0, 0, 4, 0]);
    }

    #[test]
    fn test_unrated_records_skip_satisfaction() {
        let catalog = Catalog::defaults();
        let mut responses = fixture();
        responses[0].satisfaction = None;
        responses[1].satisfaction = Some(2);
        responses[2].season = None;
        responses[3].emphasized_fragrance = None;

        let summary = DashboardSummary::compute(&responses, &catalog, None);
        assert_eq!(summary.satisfaction_histogram, [0, 1, 0, 2, 0]);
        assert!((summary.average_satisfaction - 10.0 / 3.0).abs() < 1e-9);
        let summer = summary.seasons.iter().find(|(s, _)| *s == SeasonBucket::Summer).unwrap().1;
        assert_eq!(summer, 3);
        assert!(summary.emphasized.iter().all(|f| f.id != 24));
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_fragrance_genre_matrix() {
        let catalog = Catalog::defaults();
        let summary = DashboardSummary::compute(&fixture(), &catalog, None);
        assert_eq!(summary.fragrance_genres.len(), 10);
        let top = &summary.fragrance_genres[0];
        assert_eq!(top.id, 19);
        assert_eq!(top.top_genres, vec![(MusicGenre::Jazz, 1), (MusicGenre::Indie, 1)]);
        assert!(summary.fragrance_genres[5].top_genres.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let catalog = Catalog::defaults();
        let summary = DashboardSummary::compute(&[], &catalog, None);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_age, 0.0);
        assert_eq!(summary.fragrances[0].percentage, 0.0);
        assert!(summary.emphasized.is_empty());
        assert!(summary.report().contains("Responses:              0"));
    }

    #[test]
    fn test_full_archive_figures() {
        let catalog = Catalog::defaults();
        let archive = generate_archive().unwrap();
        let summary = DashboardSummary::compute(&archive, &catalog, None);

        let seasons: Vec<usize> = summary.seasons.iter().map(|(_, n)| *n).collect();
        assert_eq!(seasons, vec![2943, 7168, 5727]);
        let ages: Vec<usize> = summary.age_groups.iter().map(|g| g.count).collect();
        assert_eq!(ages, vec![303, 10548, 3997, 582, 408]);
        assert_eq!(summary.genres[0].genre, MusicGenre::Indie);
        assert!((summary.gender_share(Gender::Male) - 38.0).abs() < 1.0);

        let overview = summary.overview();
        assert!(overview.contains("Responses:              15838"));
        assert!(overview.contains("남 38.0% / 여 62.0%"));

        let report = summary.report();
        assert!(report.starts_with("=== Survey Dashboard (전체) ==="));
        assert!(report.contains(&overview));
        assert!(report.contains("--- Fragrance x Genre ---"));
    }
}

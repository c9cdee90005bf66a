//! CSV export of stored responses, as downloaded from the admin dashboard.
//!
//! Every cell is double-quoted, headers are Korean, and the file starts
//! with a UTF-8 BOM so spreadsheet tools pick the right encoding.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike};

use crate::catalog::Catalog;
use crate::error::{ArchiveError, Result};
use crate::survey::SurveyResponse;

const BOM: char = '\u{FEFF}';

/// An exportable column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CsvColumn {
    Id,
    Age,
    Gender,
    FragranceId,
    FragranceDisplay,
    MainNote,
    Season,
    MusicGenre,
    Ratio,
    Emphasized,
    Satisfaction,
    Exhibition1,
    Exhibition2,
    Exhibition3,
    Timestamp,
}

impl CsvColumn {
    /// Every column in export order.
    pub const ALL: [CsvColumn; 15] = [
        CsvColumn::Id,
        CsvColumn::Age,
        CsvColumn::Gender,
        CsvColumn::FragranceId,
        CsvColumn::FragranceDisplay,
        CsvColumn::MainNote,
        CsvColumn::Season,
        CsvColumn::MusicGenre,
        CsvColumn::Ratio,
        CsvColumn::Emphasized,
        CsvColumn::Satisfaction,
        CsvColumn::Exhibition1,
        CsvColumn::Exhibition2,
        CsvColumn::Exhibition3,
        CsvColumn::Timestamp,
    ];

    /// Short key used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            CsvColumn::Id => "id",
            CsvColumn::Age => "age",
            CsvColumn::Gender => "gender",
            CsvColumn::FragranceId => "fragranceId",
            CsvColumn::FragranceDisplay => "fragranceDisplay",
            CsvColumn::MainNote => "mainNote",
            CsvColumn::Season => "season",
            CsvColumn::MusicGenre => "musicGenre",
            CsvColumn::Ratio => "ratio",
            CsvColumn::Emphasized => "emphasized",
            CsvColumn::Satisfaction => "satisfaction",
            CsvColumn::Exhibition1 => "ex1",
            CsvColumn::Exhibition2 => "ex2",
            CsvColumn::Exhibition3 => "ex3",
            CsvColumn::Timestamp => "timestamp",
        }
    }

    /// Header label written to the file.
    pub fn header(self) -> &'static str {
        match self {
            CsvColumn::Id => "ID",
            CsvColumn::Age => "나이",
            CsvColumn::Gender => "성별",
            CsvColumn::FragranceId => "향료번호",
            CsvColumn::FragranceDisplay => "향료표시명",
            CsvColumn::MainNote => "메인노트",
            CsvColumn::Season => "계절",
            CsvColumn::MusicGenre => "음악장르",
            CsvColumn::Ratio => "향료비율",
            CsvColumn::Emphasized => "강조향",
            CsvColumn::Satisfaction => "만족도",
            CsvColumn::Exhibition1 => "전시1",
            CsvColumn::Exhibition2 => "전시2",
            CsvColumn::Exhibition3 => "전시3",
            CsvColumn::Timestamp => "제출시간",
        }
    }

    fn cell(self, r: &SurveyResponse, catalog: &Catalog, offset: &FixedOffset) -> String {
        let display = |id: Option<u32>| {
            id.and_then(|id| catalog.get(id))
                .map(|f| f.display_name.clone())
                .unwrap_or_default()
        };
        match self {
            CsvColumn::Id => r.id.clone(),
            CsvColumn::Age => r.age.to_string(),
            CsvColumn::Gender => r.gender.label().to_string(),
            CsvColumn::FragranceId => r.selected_fragrance_id.to_string(),
            CsvColumn::FragranceDisplay => display(Some(r.selected_fragrance_id)),
            CsvColumn::MainNote => catalog
                .get(r.selected_fragrance_id)
                .map(|f| f.notes_label())
                .unwrap_or_default(),
            CsvColumn::Season => r.season.map(|s| s.label().to_string()).unwrap_or_default(),
            CsvColumn::MusicGenre => r.music_genre.label().to_string(),
            CsvColumn::Ratio => r.fragrance_ratio.label().to_string(),
            CsvColumn::Emphasized => display(r.emphasized_fragrance_id()),
            CsvColumn::Satisfaction => r.satisfaction.map(|s| s.to_string()).unwrap_or_default(),
            CsvColumn::Exhibition1 => display(r.selected_fragrance1),
            CsvColumn::Exhibition2 => display(r.selected_fragrance2),
            CsvColumn::Exhibition3 => display(r.selected_fragrance3),
            CsvColumn::Timestamp => korean_timestamp(r.timestamp, offset),
        }
    }
}

impl fmt::Display for CsvColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CsvColumn {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim();
        CsvColumn::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| ArchiveError::UnknownLabel { kind: "CSV column", value: key.to_string() })
    }
}

/// Parse a comma-separated column list ("id,age,timestamp").
pub fn parse_columns(list: &str) -> Result<Vec<CsvColumn>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Local time the way a ko-KR browser prints it: `2023. 9. 1. 오전 10:08:19`.
pub fn korean_timestamp(millis: i64, offset: &FixedOffset) -> String {
    let Some(dt) = offset.timestamp_millis_opt(millis).single() else {
        return String::new();
    };
    let (is_pm, hour12) = dt.hour12();
    format!(
        "{}. {}. {}. {} {}:{:02}:{:02}",
        dt.format("%Y"),
        dt.format("%-m"),
        dt.format("%-d"),
        if is_pm { "오후" } else { "오전" },
        hour12,
        dt.minute(),
        dt.second(),
    )
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Render responses as CSV text, BOM included.
pub fn export_csv(
    responses: &[SurveyResponse],
    catalog: &Catalog,
    columns: &[CsvColumn],
    offset: &FixedOffset,
) -> Result<String> {
    if columns.is_empty() {
        return Err(ArchiveError::NoColumnsSelected);
    }

    let mut lines = Vec::with_capacity(responses.len() + 1);
    lines.push(columns.iter().map(|c| c.header()).collect::<Vec<_>>().join(","));
    for r in responses {
        let row: Vec<String> = columns.iter().map(|c| quote(&c.cell(r, catalog, offset))).collect();
        lines.push(row.join(","));
    }

    let mut out = String::new();
    out.push(BOM);
    out.push_str(&lines.join("\n"));
    Ok(out)
}

/// Export responses to a CSV file.
pub fn write_csv(
    responses: &[SurveyResponse],
    catalog: &Catalog,
    columns: &[CsvColumn],
    offset: &FixedOffset,
    path: &Path,
) -> Result<()> {
    let csv = export_csv(responses, catalog, columns, offset)?;
    fs::write(path, csv).map_err(|e| ArchiveError::io(path, e))
}

/// Download name used by the dashboard, e.g. `acscent-survey-2025-08-30.csv`.
pub fn default_file_name(date: NaiveDate) -> String {
    format!("acscent-survey-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Exhibition, MusicGenre, SeasonBucket};
    use crate::survey::{FragranceRatio, Gender};

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn sample() -> SurveyResponse {
        SurveyResponse {
            id: "mock-1693530499845-014064643".to_string(),
            age: 22,
            gender: Gender::Female,
            selected_fragrance_id: 24,
            fragrance_name: "플레르드 뽀".to_string(),
            season: Some(SeasonBucket::Winter),
            music_genre: MusicGenre::KPop,
            fragrance_ratio: FragranceRatio::Bold,
            emphasized_fragrance: Some(Exhibition::Second),
            selected_fragrance1: Some(4),
            selected_fragrance2: Some(13),
            selected_fragrance3: Some(24),
            satisfaction: Some(5),
            timestamp: 1_693_530_499_845,
        }
    }

    #[test]
    fn test_korean_timestamp() {
        assert_eq!(korean_timestamp(1_693_530_499_845, &kst()), "2023. 9. 1. 오전 10:08:19");
        // 2023-09-01 13:05:00 KST
        assert_eq!(korean_timestamp(1_693_541_100_000, &kst()), "2023. 9. 1. 오후 1:05:00");
        // 2023-09-01 12:00:00 KST
        assert_eq!(korean_timestamp(1_693_537_200_000, &kst()), "2023. 9. 1. 오후 12:00:00");
    }

    #[test]
    fn test_export_all_columns() {
        let catalog = Catalog::defaults();
        let csv = export_csv(&[sample()], &catalog, &CsvColumn::ALL, &kst()).unwrap();

        assert!(csv.starts_with('\u{FEFF}'));
        let mut lines = csv.trim_start_matches('\u{FEFF}').lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,나이,성별,향료번호,향료표시명,메인노트,계절,음악장르,향료비율,강조향,만족도,전시1,전시2,전시3,제출시간"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"mock-1693530499845-014064643\",\"22\",\"여성\",\"24\",\"AC'SCENT 24\",\"패출리\",\"겨울\""));
        // Emphasized slot 2 holds fragrance 13.
        assert!(row.contains("\"60/20/20\",\"AC'SCENT 13\",\"5\",\"AC'SCENT 04\",\"AC'SCENT 13\",\"AC'SCENT 24\""));
        assert!(row.ends_with("\"2023. 9. 1. 오전 10:08:19\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_selected_columns() {
        let catalog = Catalog::defaults();
        let columns = parse_columns("age, musicGenre").unwrap();
        let csv = export_csv(&[sample(), sample()], &catalog, &columns, &kst()).unwrap();
        assert_eq!(csv, "\u{FEFF}나이,음악장르\n\"22\",\"K-POP\"\n\"22\",\"K-POP\"");
    }

    #[test]
    fn test_export_requires_columns() {
        let catalog = Catalog::defaults();
        let err = export_csv(&[sample()], &catalog, &[], &kst()).unwrap_err();
        assert!(matches!(err, ArchiveError::NoColumnsSelected));
    }

    #[test]
    fn test_missing_answers_export_blank() {
        let catalog = Catalog::defaults();
        let mut r = sample();
        r.season = None;
        r.satisfaction = None;
        r.selected_fragrance1 = None;
        r.emphasized_fragrance = Some(Exhibition::First);
        let columns = parse_columns("season,emphasized,satisfaction,ex1,ex2").unwrap();
        let csv = export_csv(&[r], &catalog, &columns, &kst()).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "\"\",\"\",\"\",\"\",\"AC'SCENT 13\"");
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_parse_unknown_column() {
        assert!(matches!(
            parse_columns("id,height"),
            Err(ArchiveError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_file_name(NaiveDate::from_ymd_opt(2025, 8, 30).unwrap()));
        write_csv(&[sample()], &Catalog::defaults(), &[CsvColumn::Id], &kst(), &path).unwrap();
        assert!(path.ends_with("acscent-survey-2025-08-30.csv"));
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}

//! Daily visitor volume.
//!
//! Volume grows with the exhibition's popularity year over year, peaks in
//! summer and winter, and gets extra holiday crowds in late December.

use crate::calendar::VisitDay;
use crate::random::DrawSource;

const PEAK_SEASON_WEIGHT: f64 = 2.5;
const DECEMBER_EVENT_WEIGHT: f64 = 1.8;

const BASE_VISITORS_MIN: u32 = 5;
const BASE_VISITORS_SPREAD: u32 = 5;

/// Seasonal multiplier: summer (Jun-Aug) and winter (Dec-Feb) peak.
pub fn season_weight(month: u32) -> f64 {
    match month {
        6..=8 | 12 | 1 | 2 => PEAK_SEASON_WEIGHT,
        _ => 1.0,
    }
}

/// Year-over-year growth. Only the years the exhibition ran are modeled.
pub fn growth_weight(year: i32) -> Option<f64> {
    match year {
        2023 => Some(0.3),
        2024 => Some(1.5),
        2025 => Some(2.5),
        _ => None,
    }
}

/// Christmas and year-end multiplier for December.
pub fn event_weight(month: u32) -> f64 {
    if month == 12 {
        DECEMBER_EVENT_WEIGHT
    } else {
        1.0
    }
}

/// season x growth x event, multiplied in that order.
pub fn month_weight(year: i32, month: u32) -> Option<f64> {
    Some(season_weight(month) * growth_weight(year)? * event_weight(month))
}

/// 5-9 visitors before weighting. One draw.
pub fn base_visitors(rng: &mut impl DrawSource) -> u32 {
    BASE_VISITORS_MIN + (rng.draw() * BASE_VISITORS_SPREAD as f64).floor() as u32
}

/// Holiday periods that bring an extra batch of visitors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HolidayRush {
    /// December 20-26.
    Christmas,
    /// December 27-31.
    YearEnd,
}

impl HolidayRush {
    pub fn on(day: &VisitDay) -> Option<Self> {
        if day.month() != 12 {
            return None;
        }
        match day.day() {
            20..=26 => Some(HolidayRush::Christmas),
            27..=31 => Some(HolidayRush::YearEnd),
            _ => None,
        }
    }

    /// Extra visitors as a share of the regular daily count.
    pub fn factor(self) -> f64 {
        match self {
            HolidayRush::Christmas => 0.5,
            HolidayRush::YearEnd => 0.3,
        }
    }
}

/// Visitor counts for one day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayVolume {
    /// Holiday visitors, emitted before the regular ones.
    pub bonus: u32,
    pub regular: u32,
}

impl DayVolume {
    pub fn total(&self) -> u32 {
        self.bonus + self.regular
    }
}

/// Counts for `day` given its month weight. Consumes the day's one draw.
pub fn plan_day(rng: &mut impl DrawSource, day: &VisitDay, weight: f64) -> DayVolume {
    let base = base_visitors(rng);
    let regular = (base as f64 * weight).floor() as u32;
    let bonus = HolidayRush::on(day)
        .map(|rush| (regular as f64 * rush.factor()).floor() as u32)
        .unwrap_or(0);
    DayVolume { bonus, regular }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedDraws;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> VisitDay {
        VisitDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_season_weights() {
        assert_eq!(season_weight(7), 2.5);
        assert_eq!(season_weight(1), 2.5);
        assert_eq!(season_weight(12), 2.5);
        assert_eq!(season_weight(5), 1.0);
        assert_eq!(season_weight(9), 1.0);
    }

    #[test]
    fn test_growth_weights() {
        assert_eq!(growth_weight(2023), Some(0.3));
        assert_eq!(growth_weight(2025), Some(2.5));
        assert_eq!(growth_weight(2022), None);
        assert_eq!(growth_weight(2026), None);
    }

    #[test]
    fn test_month_weight_combines() {
        assert_eq!(month_weight(2024, 12), Some(2.5 * 1.5 * 1.8));
        assert_eq!(month_weight(2025, 4), Some(2.5));
        assert_eq!(month_weight(2019, 4), None);
    }

    #[test]
    fn test_base_visitors_range() {
        assert_eq!(base_visitors(&mut ScriptedDraws::new(&[0.0])), 5);
        assert_eq!(base_visitors(&mut ScriptedDraws::new(&[0.999])), 9);
    }

    #[test]
    fn test_holiday_rush_periods() {
        assert_eq!(HolidayRush::on(&day(2024, 12, 19)), None);
        assert_eq!(HolidayRush::on(&day(2024, 12, 20)), Some(HolidayRush::Christmas));
        assert_eq!(HolidayRush::on(&day(2024, 12, 26)), Some(HolidayRush::Christmas));
        assert_eq!(HolidayRush::on(&day(2024, 12, 27)), Some(HolidayRush::YearEnd));
        assert_eq!(HolidayRush::on(&day(2024, 12, 31)), Some(HolidayRush::YearEnd));
        assert_eq!(HolidayRush::on(&day(2025, 1, 1)), None);
        assert_eq!(HolidayRush::on(&day(2024, 11, 25)), None);
    }

    #[test]
    fn test_plan_regular_day() {
        // base 9, 2025 summer weight 6.25 -> 56
        let d = day(2025, 7, 10);
        let weight = month_weight(2025, 7).unwrap();
        let volume = plan_day(&mut ScriptedDraws::new(&[0.9]), &d, weight);
        assert_eq!(volume, DayVolume { bonus: 0, regular: 56 });
    }

    #[test]
    fn test_plan_christmas_day() {
        // base 5, weight 6.75 -> 33 regular, floor(16.5) = 16 bonus
        let d = day(2024, 12, 24);
        let weight = month_weight(2024, 12).unwrap();
        let volume = plan_day(&mut ScriptedDraws::new(&[0.0]), &d, weight);
        assert_eq!(volume.regular, 33);
        assert_eq!(volume.bonus, 16);
        assert_eq!(volume.total(), 49);
    }

    #[test]
    fn test_plan_year_end_day() {
        // base 5, weight 6.75 -> 33 regular, floor(9.9) = 9 bonus
        let d = day(2024, 12, 30);
        let weight = month_weight(2024, 12).unwrap();
        let volume = plan_day(&mut ScriptedDraws::new(&[0.0]), &d, weight);
        assert_eq!(volume.bonus, 9);
    }
}

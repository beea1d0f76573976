use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

/// Astronomical northern-hemisphere season for a calendar date.
#[must_use]
pub fn season_for_date(date: NaiveDate) -> Season {
    let (month, day) = (date.month(), date.day());
    match (month, day) {
        (12, 21..) | (1 | 2, _) | (3, ..20) => Season::Winter,
        (3, _) | (4 | 5, _) | (6, ..21) => Season::Spring,
        (6, _) | (7 | 8, _) | (9, ..22) => Season::Summer,
        _ => Season::Fall,
    }
}

#[must_use]
pub fn current_season() -> Season {
    season_for_date(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).expect("valid date")
    }

    #[test]
    fn solstice_and_equinox_boundaries() {
        assert_eq!(season_for_date(date(3, 19)), Season::Winter);
        assert_eq!(season_for_date(date(3, 20)), Season::Spring);
        assert_eq!(season_for_date(date(6, 20)), Season::Spring);
        assert_eq!(season_for_date(date(6, 21)), Season::Summer);
        assert_eq!(season_for_date(date(9, 21)), Season::Summer);
        assert_eq!(season_for_date(date(9, 22)), Season::Fall);
        assert_eq!(season_for_date(date(12, 20)), Season::Fall);
        assert_eq!(season_for_date(date(12, 21)), Season::Winter);
    }

    #[test]
    fn mid_season_dates() {
        assert_eq!(season_for_date(date(1, 15)), Season::Winter);
        assert_eq!(season_for_date(date(5, 1)), Season::Spring);
        assert_eq!(season_for_date(date(8, 1)), Season::Summer);
        assert_eq!(season_for_date(date(10, 19)), Season::Fall);
    }
}

//! Academic year labels.
//!
//! A school year runs from September to July and is named after the calendar
//! year it starts in. January through July still belong to the previous label.

use chrono::{Datelike, Local};

/// Last month (inclusive) that belongs to the previous year's label.
const LAST_MONTH_OF_YEAR: u32 = 7;

pub fn current_academic_year<D: Datelike>(now: &D) -> i32 {
    if now.month() <= LAST_MONTH_OF_YEAR {
        now.year() - 1
    } else {
        now.year()
    }
}

/// [`current_academic_year`] for today's local date.
pub fn current_academic_year_now() -> i32 {
    current_academic_year(&Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_january_through_july_belong_to_previous_year() {
        for month in 1..=7 {
            assert_eq!(current_academic_year(&date(2026, month, 15)), 2025);
        }
    }

    #[test]
    fn test_august_through_december_belong_to_current_year() {
        for month in 8..=12 {
            assert_eq!(current_academic_year(&date(2026, month, 1)), 2026);
        }
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(current_academic_year(&date(2025, 7, 31)), 2024);
        assert_eq!(current_academic_year(&date(2025, 8, 1)), 2025);
        assert_eq!(current_academic_year(&date(2025, 1, 1)), 2024);
        assert_eq!(current_academic_year(&date(2025, 12, 31)), 2025);
    }
}

use chrono::{Datelike, NaiveDate};

/// Whole years between `date_of_birth` and `today`.
///
/// One year is subtracted while the birthday has not yet come around in
/// `today`'s year. Negative when `date_of_birth` is after `today`; callers
/// decide whether that is an error.
pub fn age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_before_birthday() {
        assert_eq!(age(date(1990, 6, 15), date(2024, 6, 14)), 33);
    }

    #[test]
    fn on_birthday() {
        assert_eq!(age(date(1990, 6, 15), date(2024, 6, 15)), 34);
    }

    #[test]
    fn earlier_month_later_day() {
        assert_eq!(age(date(1957, 3, 30), date(2024, 2, 1)), 66);
    }

    #[test]
    fn born_today_is_zero() {
        assert_eq!(age(date(2024, 6, 15), date(2024, 6, 15)), 0);
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(age(date(1960, 2, 29), date(2023, 2, 28)), 62);
        assert_eq!(age(date(1960, 2, 29), date(2023, 3, 1)), 63);
    }

    #[test]
    fn never_negative_for_past_dates() {
        let today = date(2024, 1, 1);
        for year in 1920..=2024 {
            assert!(age(date(year, 12, 31).min(today), today) >= 0);
        }
    }
}

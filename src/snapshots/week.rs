//! ISO calendar week helpers.

use chrono::{Days, NaiveDate, Weekday};
use serde_json::{Map, Value};

use crate::consts::{DAY_DATE_FORMAT, MAX_YEAR, MIN_YEAR, WEEKDAY_LABELS};
use crate::error::{Result, StoreError};

/// Monday of ISO week `week` of ISO year `year`.
pub fn monday_of(week: u32, year: i32) -> Result<NaiveDate> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(StoreError::InvalidWeek { week, year });
    }
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
        .ok_or(StoreError::InvalidWeek { week, year })
}

/// Monday..Sunday of the week.
pub fn week_dates(week: u32, year: i32) -> Result<[NaiveDate; 7]> {
    let monday = monday_of(week, year)?;
    let mut out = [monday; 7];
    for (i, d) in out.iter_mut().enumerate().skip(1) {
        *d = monday
            .checked_add_days(Days::new(i as u64))
            .ok_or(StoreError::InvalidWeek { week, year })?;
    }
    Ok(out)
}

/// `"Montag (30.12.2024)" -> "30.12.2024"`, in weekday order.
pub fn day_labels(dates: &[NaiveDate; 7]) -> Map<String, Value> {
    let mut days = Map::new();
    for (label, date) in WEEKDAY_LABELS.iter().zip(dates.iter()) {
        let d = date.format(DAY_DATE_FORMAT).to_string();
        days.insert(format!("{label} ({d})"), Value::String(d));
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_one_of_2025_starts_in_2024() {
        let m = monday_of(1, 2025).unwrap();
        assert_eq!(m, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    }

    #[test]
    fn week_53_only_in_long_years() {
        // 2020 имеет 53 ISO-недели, 2023 — нет.
        assert!(monday_of(53, 2020).is_ok());
        assert!(matches!(
            monday_of(53, 2023),
            Err(StoreError::InvalidWeek { week: 53, year: 2023 })
        ));
        assert!(monday_of(0, 2024).is_err());
        assert!(monday_of(54, 2026).is_err());
        assert!(monday_of(1, 0).is_err());
        assert!(monday_of(1, 10_000).is_err());
    }

    #[test]
    fn labels_cover_the_week_in_order() {
        let dates = week_dates(1, 2025).unwrap();
        let days = day_labels(&dates);
        let keys: Vec<&str> = days.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 7);
        assert_eq!(keys[0], "Montag (30.12.2024)");
        assert_eq!(keys[2], "Mittwoch (01.01.2025)");
        assert_eq!(keys[6], "Sonntag (05.01.2025)");
        assert_eq!(days["Sonntag (05.01.2025)"], Value::from("05.01.2025"));
    }
}

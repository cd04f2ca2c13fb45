//! Age calculator.
//!
//! Years and months are whole months elapsed; days are counted from the
//! last monthly anniversary, which falls on the month's last day when the
//! birth day does not exist in that month. So 2000-02-29 → 2024-03-01 is
//! 24 years, 0 months, 1 day, and 2023-01-31 → 2023-03-01 is 0 years,
//! 1 month, 1 day (anniversary 2023-02-28).

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Elapsed calendar time between two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    /// Total days between the two dates.
    pub total_days: i64,
}

/// Compute the age on `today` of someone born on `birth`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidInput`] if `birth` is after `today`.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> Result<Age, ToolError> {
    if birth > today {
        return Err(ToolError::InvalidInput(format!(
            "birth date {birth} is after {today}"
        )));
    }

    #[expect(clippy::cast_possible_wrap)]
    let mut elapsed = (today.year() - birth.year()) * 12 + today.month() as i32
        - birth.month() as i32;
    let mut anniversary = monthly_anniversary(birth, elapsed)?;
    if anniversary > today {
        elapsed -= 1;
        anniversary = monthly_anniversary(birth, elapsed)?;
    }

    let to_u32 = |v: i64| {
        u32::try_from(v).map_err(|_| ToolError::InvalidInput(format!("age component {v} is out of range")))
    };
    Ok(Age {
        years: to_u32(i64::from(elapsed / 12))?,
        months: to_u32(i64::from(elapsed % 12))?,
        days: to_u32((today - anniversary).num_days())?,
        total_days: (today - birth).num_days(),
    })
}

/// `birth` moved forward by `months`, clamped to the end of a shorter
/// month (January 31 + 1 month is February 28 or 29).
fn monthly_anniversary(birth: NaiveDate, months: i32) -> Result<NaiveDate, ToolError> {
    u32::try_from(months)
        .ok()
        .and_then(|m| birth.checked_add_months(Months::new(m)))
        .ok_or_else(|| ToolError::InvalidInput(format!("{months} months after {birth} is out of range")))
}

/// Days from `today` until the next birthday (0 when it is today).
///
/// A February 29 birthday is celebrated on March 1 in non-leap years.
///
/// # Errors
///
/// Returns [`ToolError::InvalidInput`] if `birth` is after `today`.
pub fn days_until_next_birthday(birth: NaiveDate, today: NaiveDate) -> Result<i64, ToolError> {
    if birth > today {
        return Err(ToolError::InvalidInput(format!(
            "birth date {birth} is after {today}"
        )));
    }
    let this_year = birthday_in(birth, today.year())?;
    let next = if this_year >= today {
        this_year
    } else {
        birthday_in(birth, today.year() + 1)?
    };
    Ok((next - today).num_days())
}

fn birthday_in(birth: NaiveDate, year: i32) -> Result<NaiveDate, ToolError> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .ok_or_else(|| ToolError::InvalidInput(format!("year {year} is out of range")))
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`ToolError::InvalidInput`] if `s` is not a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ToolError::InvalidInput(format!("invalid date {s:?}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn ymd(age: Age) -> (u32, u32, u32) {
        (age.years, age.months, age.days)
    }

    #[test]
    fn leap_day_birth_on_leap_year() {
        let age = calculate_age(d("2000-02-29"), d("2024-03-01")).unwrap();
        assert_eq!(ymd(age), (24, 0, 1));
    }

    #[test]
    fn leap_day_birth_on_common_year() {
        // Anniversary clamps to 2023-02-28.
        let age = calculate_age(d("2000-02-29"), d("2023-03-01")).unwrap();
        assert_eq!(ymd(age), (23, 0, 1));
        let age = calculate_age(d("2000-02-29"), d("2023-02-28")).unwrap();
        assert_eq!(ymd(age), (23, 0, 0));
    }

    #[test]
    fn late_month_birth_days_clamp_to_month_end() {
        let age = calculate_age(d("2023-01-31"), d("2023-03-01")).unwrap();
        assert_eq!(ymd(age), (0, 1, 1));
        let age = calculate_age(d("2023-03-31"), d("2023-05-01")).unwrap();
        assert_eq!(ymd(age), (0, 1, 1));
        let age = calculate_age(d("2023-01-30"), d("2023-03-01")).unwrap();
        assert_eq!(ymd(age), (0, 1, 1));
        let age = calculate_age(d("1999-12-31"), d("2024-03-01")).unwrap();
        assert_eq!(ymd(age), (24, 2, 1));
    }

    #[test]
    fn every_day_of_a_year_is_accepted() {
        let today = d("2024-03-01");
        let mut birth = d("2023-01-01");
        while birth <= today {
            let age = calculate_age(birth, today).unwrap();
            assert!(age.days < 31, "{birth}: {age:?}");
            birth = birth.succ_opt().unwrap();
        }
    }

    #[test]
    fn same_day_is_zero() {
        let age = calculate_age(d("1990-06-15"), d("1990-06-15")).unwrap();
        assert_eq!(ymd(age), (0, 0, 0));
        assert_eq!(age.total_days, 0);
    }

    #[test]
    fn day_before_birthday() {
        let age = calculate_age(d("1990-06-15"), d("2020-06-14")).unwrap();
        // Last anniversary 2020-05-15.
        assert_eq!(ymd(age), (29, 11, 30));
    }

    #[test]
    fn january_borrows_december() {
        let age = calculate_age(d("2019-12-20"), d("2020-01-05")).unwrap();
        assert_eq!(ymd(age), (0, 0, 16));
    }

    #[test]
    fn total_days_counts_calendar_days() {
        let age = calculate_age(d("2020-01-01"), d("2021-01-01")).unwrap();
        assert_eq!(age.total_days, 366);
        assert_eq!(ymd(age), (1, 0, 0));
    }

    #[test]
    fn future_birth_is_invalid() {
        assert!(matches!(
            calculate_age(d("2030-01-01"), d("2024-01-01")),
            Err(ToolError::InvalidInput(_))
        ));
    }

    #[test]
    fn next_birthday() {
        assert_eq!(days_until_next_birthday(d("1990-06-15"), d("2024-06-15")).unwrap(), 0);
        assert_eq!(days_until_next_birthday(d("1990-06-15"), d("2024-06-14")).unwrap(), 1);
        // Passed this year: wraps to 2025-01-01.
        assert_eq!(days_until_next_birthday(d("1990-01-01"), d("2024-12-31")).unwrap(), 1);
        // Leap-day birthday in a common year falls on March 1.
        assert_eq!(days_until_next_birthday(d("2000-02-29"), d("2023-02-28")).unwrap(), 1);
    }

    #[test]
    fn bad_date_string() {
        assert!(matches!(parse_date("2024-02-30"), Err(ToolError::InvalidInput(_))));
    }
}

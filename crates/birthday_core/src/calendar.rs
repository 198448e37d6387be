//! Birth date parsing and next-occurrence arithmetic.
//!
//! # Responsibility
//! - Parse the two accepted birth date input shapes into calendar dates.
//! - Compute days-until-birthday and upcoming age relative to a reference day.
//!
//! # Invariants
//! - Parsed dates carry no time-of-day component.
//! - `days_until` is 0 on the occurrence day itself, never negative.
//! - A Feb 29 birth date resolves to Mar 1 in non-leap target years.

use chrono::{DateTime, Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DOTTED_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})\.(\d{1,2})\.(\d{1,2})$").expect("valid dotted date regex"));

/// Error for unparseable input or input naming no real calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateError {
    raw: String,
}

impl InvalidDateError {
    fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the rejected input verbatim.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl Display for InvalidDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid birth date `{}`; expected YYYY.MM.DD or an RFC 3339 timestamp",
            self.raw
        )
    }
}

impl Error for InvalidDateError {}

/// Parses a raw birth date string into a pure calendar date.
///
/// Two input shapes are accepted:
/// - a timestamp string (detected by a `T` separator), parsed as RFC 3339
///   and reduced to its calendar day in the timestamp's own offset, so
///   timezone conversion can never shift the day;
/// - a dotted `YEAR.MONTH.DAY` string with 1-2 digit month/day, where a
///   literal `00` month or day is coerced to `01` before validation
///   (legacy datasets contain such records; the original app substitutes
///   instead of rejecting, and callers rely on that).
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, InvalidDateError> {
    let trimmed = raw.trim();

    if trimmed.contains('T') {
        return DateTime::parse_from_rfc3339(trimmed)
            .map(|stamp| stamp.date_naive())
            .map_err(|_| InvalidDateError::new(trimmed));
    }

    let captures = DOTTED_DATE_RE
        .captures(trimmed)
        .ok_or_else(|| InvalidDateError::new(trimmed))?;
    let year = captures[1]
        .parse::<i32>()
        .map_err(|_| InvalidDateError::new(trimmed))?;
    let month = coerce_zero_component(&captures[2]);
    let day = coerce_zero_component(&captures[3]);

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| InvalidDateError::new(trimmed))
}

fn coerce_zero_component(component: &str) -> u32 {
    match component.parse::<u32>() {
        Ok(0) | Err(_) => 1,
        Ok(value) => value,
    }
}

/// Returns the next calendar occurrence of `birth`'s month/day.
///
/// The candidate is this year's occurrence; when that day is strictly
/// before `today` it advances by exactly one year. `today` itself counts
/// as the occurrence.
pub fn next_occurrence(birth: NaiveDate, today: NaiveDate) -> NaiveDate {
    let candidate = occurrence_in_year(birth, today.year());
    if candidate < today {
        occurrence_in_year(birth, today.year() + 1)
    } else {
        candidate
    }
}

fn occurrence_in_year(birth: NaiveDate, year: i32) -> NaiveDate {
    // `with_year` has no Feb 29 in non-leap years; the policy is Mar 1,
    // matching how the original implementation rolled the day over.
    birth.with_year(year).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(year, 3, 1).expect("Mar 1 exists in every year")
    })
}

/// Derived display facts for one birth date evaluated against `today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayFacts {
    /// Next calendar instance of the birth month/day.
    pub next_occurrence: NaiveDate,
    /// Whole days from `today` to the occurrence; 0 on the day itself.
    pub days_until: i64,
    /// Age turned on the occurrence.
    pub upcoming_age: i32,
    /// Localized month/day display string.
    pub formatted_date: String,
}

/// Computes all derived birthday fields in one pass.
pub fn birthday_facts(birth: NaiveDate, today: NaiveDate) -> BirthdayFacts {
    let next_occurrence = next_occurrence(birth, today);
    BirthdayFacts {
        next_occurrence,
        days_until: (next_occurrence - today).num_days(),
        upcoming_age: next_occurrence.year() - birth.year(),
        formatted_date: format_display(birth),
    }
}

/// Formats a birth date as the month/day display string (`MM月dd日`).
pub fn format_display(birth: NaiveDate) -> String {
    format!("{:02}月{:02}日", birth.month(), birth.day())
}

/// Serde codec keeping `birthDate` in the dotted `YYYY.MM.DD` wire format,
/// so exported rosters round-trip through [`parse_birth_date`].
pub mod birth_date_format {
    use super::parse_birth_date;
    use chrono::{Datelike, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!(
            "{:04}.{:02}.{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_birth_date(&raw).map_err(de::Error::custom)
    }
}

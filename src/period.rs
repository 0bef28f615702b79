//! Period bucketing: timestamps → calendar day/month keys.
//!
//! Display keys ("5 Jan '24", "Jan '24") do not sort chronologically as
//! strings, so every `Period` carries the real `NaiveDate` it was derived
//! from and all ordering goes through that date. The date is canonicalized
//! (first of month for month granularity), which makes key equality and
//! date equality coincide: two records with the same key are the same
//! period.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::types::Granularity;

/// A calendar bucket: display key plus the canonical date used for
/// ordering. The date never reaches the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub key: String,
    pub date: NaiveDate,
}

impl Period {
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Period {
        match granularity {
            Granularity::Day => Period {
                key: date.format("%-d %b '%y").to_string(),
                date,
            },
            Granularity::Month => {
                let first = date.with_day(1).unwrap_or(date);
                Period {
                    key: first.format("%b '%y").to_string(),
                    date: first,
                }
            }
        }
    }

    /// Bucket a raw timestamp string. `None` when the timestamp doesn't
    /// resolve to a date; such records contribute to no period.
    pub fn from_raw(raw: &str, granularity: Granularity) -> Option<Period> {
        resolve_date(raw).map(|d| Period::from_date(d, granularity))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.date.cmp(&other.date)
    }
}

/// Resolve a raw timestamp string to a calendar date.
///
/// Tries RFC 3339 first, then common naive datetime shapes, then a bare
/// date. Anything else is "no date" rather than an error.
pub fn resolve_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.date());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Sort by real calendar date and drop duplicate keys. Canonicalized dates
/// make duplicates adjacent after the sort.
pub fn ordered_periods(mut periods: Vec<Period>) -> Vec<Period> {
    periods.sort_by(|a, b| a.date.cmp(&b.date));
    periods.dedup_by(|a, b| a.key == b.key);
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> Period {
        Period::from_raw(raw, Granularity::Day).unwrap()
    }

    #[test]
    fn day_key_format() {
        assert_eq!(day("2024-01-05").key, "5 Jan '24");
        assert_eq!(day("2024-12-25T10:30:00Z").key, "25 Dec '24");
    }

    #[test]
    fn month_key_canonicalizes_to_first_of_month() {
        let a = Period::from_raw("2024-01-05", Granularity::Month).unwrap();
        let b = Period::from_raw("2024-01-28", Granularity::Month).unwrap();
        assert_eq!(a.key, "Jan '24");
        assert_eq!(a, b);
        assert_eq!(a.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn ordering_is_chronological_not_lexical() {
        // Lexically "12 Feb '24" < "3 Mar '25" < "5 Jan '24"; chronologically
        // the reverse of the first and last.
        let periods = vec![day("2025-03-03"), day("2024-01-05"), day("2024-02-12")];
        let ordered = ordered_periods(periods);
        let keys: Vec<&str> = ordered.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["5 Jan '24", "12 Feb '24", "3 Mar '25"]);
    }

    #[test]
    fn ordered_periods_dedupes_same_key() {
        let periods = vec![day("2024-01-05"), day("2024-01-05"), day("2024-01-06")];
        assert_eq!(ordered_periods(periods).len(), 2);
    }

    #[test]
    fn unparseable_dates_resolve_to_none() {
        assert_eq!(resolve_date(""), None);
        assert_eq!(resolve_date("   "), None);
        assert_eq!(resolve_date("not a date"), None);
        assert_eq!(resolve_date("2024-13-40"), None);
    }

    #[test]
    fn resolve_date_format_fallback() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(resolve_date("2024-02-01"), Some(expected));
        assert_eq!(resolve_date("2024-02-01T09:15:00"), Some(expected));
        assert_eq!(resolve_date("2024-02-01 09:15:00"), Some(expected));
        assert_eq!(resolve_date("2024-02-01T09:15:00+05:30"), Some(expected));
    }
}

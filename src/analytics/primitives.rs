//! Shared aggregation primitives: interpolated percentiles, calendar
//! bucketing, and gap-filled ranges. Everything here is pure and covered
//! by unit tests so the aggregators can lean on it without re-deriving
//! boundary behavior.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};

/// Continuous (interpolated) percentile over unsorted samples, the same
/// semantics as SQL `percentile_cont`. `p` is in `[0, 1]`.
///
/// Returns `None` for an empty sample set; a metric with no qualifying
/// observations is omitted, never reported as zero.
pub fn percentile_cont(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// A calendar month bucket, ordered year-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(instant: DateTime<Utc>) -> Self {
        YearMonth {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First instant of the following month; an exclusive month-end bound.
    pub fn end_exclusive(self) -> DateTime<Utc> {
        let next = self.next();
        Utc.with_ymd_and_hms(next.year, next.month, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Every month from `start` through `end` inclusive. Empty if
/// `start > end`.
pub fn month_range(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        months.push(cursor);
        cursor = cursor.next();
    }
    months
}

/// The trailing `days`-day window ending at `now`, one date per day,
/// oldest first. Used for gap-filled daily series.
pub fn trailing_days(now: DateTime<Utc>, days: u64) -> Vec<NaiveDate> {
    let today = now.date_naive();
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Whole-day difference, truncated toward zero.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates() {
        let samples = [1.0, 2.0, 3.0, 4.0, 10.0];
        assert_eq!(percentile_cont(&samples, 0.5), Some(3.0));
        let p90 = percentile_cont(&samples, 0.9).unwrap();
        assert!(p90 > 4.0 && p90 < 10.0, "p90 was {}", p90);
    }

    #[test]
    fn percentile_empty_is_none() {
        assert_eq!(percentile_cont(&[], 0.5), None);
    }

    #[test]
    fn percentile_single_sample() {
        assert_eq!(percentile_cont(&[7.0], 0.9), Some(7.0));
    }

    #[test]
    fn month_range_spans_year_boundary() {
        let months = month_range(
            YearMonth {
                year: 2023,
                month: 11,
            },
            YearMonth {
                year: 2024,
                month: 2,
            },
        );
        let labels: Vec<String> = months.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn month_end_is_first_of_next_month() {
        let ym = YearMonth {
            year: 2015,
            month: 12,
        };
        let end = ym.end_exclusive();
        assert_eq!((end.year(), end.month(), end.day()), (2016, 1, 1));
    }

    #[test]
    fn trailing_days_is_contiguous_and_ends_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let days = trailing_days(now, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].to_string(), "2024-02-28");
        assert_eq!(days[6].to_string(), "2024-03-05");
    }
}

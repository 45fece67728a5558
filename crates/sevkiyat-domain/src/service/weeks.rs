//! Fixed-length week bucketing
//!
//! The business runs a Sunday-to-Saturday six-working-day cycle. Weeks are
//! fixed 7-day windows anchored to a configured reference Sunday, not
//! calendar weeks, so no calendar-library week-numbering ambiguity applies.

use chrono::NaiveDate;
use sevkiyat_types::ShiftType;

/// One 7-day window of `(date, shift)` items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    /// 0 for the window starting at the reference date; negative before it
    pub index: i64,
    /// Sorted chronologically, day shift before night shift on the same date
    pub items: Vec<(NaiveDate, ShiftType)>,
}

impl WeekBucket {
    /// First date of this window
    pub fn start(&self, reference: NaiveDate) -> NaiveDate {
        reference + chrono::Duration::days(self.index * 7)
    }
}

/// Index of the 7-day window containing `date`, relative to the reference
pub fn week_index(date: NaiveDate, reference: NaiveDate) -> i64 {
    (date - reference).num_days().div_euclid(7)
}

/// Group `(date, shift)` items into fixed 7-day windows.
///
/// Buckets come out ordered by index; items within a bucket are sorted by
/// date, then day shift before night shift.
pub fn bucket_into_weeks(
    items: &[(NaiveDate, ShiftType)],
    reference: NaiveDate,
) -> Vec<WeekBucket> {
    let mut buckets: std::collections::BTreeMap<i64, Vec<(NaiveDate, ShiftType)>> =
        std::collections::BTreeMap::new();

    for &(date, shift) in items {
        buckets.entry(week_index(date, reference)).or_default().push((date, shift));
    }

    buckets
        .into_iter()
        .map(|(index, mut items)| {
            items.sort();
            WeekBucket { index, items }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        // A known Sunday
        NaiveDate::from_ymd_opt(2025, 6, 29).unwrap()
    }

    #[test]
    fn test_week_boundary() {
        let saturday = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 7, 6).unwrap();
        assert_eq!(week_index(saturday, reference()), 0);
        assert_eq!(week_index(sunday, reference()), 1);
    }

    #[test]
    fn test_dates_before_reference_get_negative_index() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        assert_eq!(week_index(date, reference()), -1);
    }

    #[test]
    fn test_bucket_ordering() {
        let d1 = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let items = vec![
            (d2, ShiftType::Gunduz),
            (d1, ShiftType::Gece),
            (d1, ShiftType::Gunduz),
        ];

        let buckets = bucket_into_weeks(&items, reference());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].index, 0);
        // Day shift sorts before night shift on the same date
        assert_eq!(
            buckets[0].items,
            vec![(d1, ShiftType::Gunduz), (d1, ShiftType::Gece)]
        );
        assert_eq!(buckets[1].index, 1);
        assert_eq!(buckets[1].start(reference()), NaiveDate::from_ymd_opt(2025, 7, 6).unwrap());
    }

    #[test]
    fn test_empty_items() {
        assert!(bucket_into_weeks(&[], reference()).is_empty());
    }
}

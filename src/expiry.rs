//! Date-based expiry classification.
//!
//! The cutoff is `today - retention_days`. Both comparisons are strict, so an
//! entry dated exactly on the cutoff lands in neither the expired nor the
//! active bucket and is dropped from the rewritten list without an audit
//! record.

use chrono::{Days, NaiveDate};

use crate::entry::Entry;

/// Outcome of comparing an entry's date against the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Dated strictly before the cutoff.
    Expired,
    /// Dated strictly after the cutoff, or undated.
    ActiveCandidate,
    /// Dated exactly on the cutoff.
    OnCutoff,
}

/// First day that is no longer inside the retention window.
///
/// Saturates at the earliest representable date instead of overflowing.
pub fn cutoff_date(today: NaiveDate, retention_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Classify an entry against a precomputed cutoff.
pub fn classify_against(entry: &Entry, cutoff: NaiveDate) -> Expiry {
    match entry.date() {
        None => Expiry::ActiveCandidate,
        Some(date) if date < cutoff => Expiry::Expired,
        Some(date) if date > cutoff => Expiry::ActiveCandidate,
        Some(_) => Expiry::OnCutoff,
    }
}

/// Classify an entry for a given day and retention window.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use edlman::entry::Entry;
/// use edlman::expiry::{classify, Expiry};
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let old = Entry::parse_line("192.168.1.5 # test host # 2000-01-01");
/// assert_eq!(classify(&old, today, 30), Expiry::Expired);
///
/// let undated = Entry::parse_line("10.0.0.1 # keep #");
/// assert_eq!(classify(&undated, today, 30), Expiry::ActiveCandidate);
/// ```
pub fn classify(entry: &Entry, today: NaiveDate, retention_days: u32) -> Expiry {
    classify_against(entry, cutoff_date(today, retention_days))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    proptest! {
        /// The bucket is decided purely by the sign of (date - cutoff)
        #[test]
        fn prop_boundary_convention(offset in -5000i64..5000, retention in 0u32..3650) {
            let today = base();
            let cutoff = cutoff_date(today, retention);
            let date = cutoff + chrono::Duration::days(offset);
            let expected = match offset {
                o if o < 0 => Expiry::Expired,
                0 => Expiry::OnCutoff,
                _ => Expiry::ActiveCandidate,
            };
            prop_assert_eq!(classify(&Entry::new("x", "", Some(date)), today, retention), expected);
        }

        /// Undated entries are active whatever the day and window
        #[test]
        fn prop_undated_active(days in 0i64..100_000, retention in any::<u32>()) {
            let today = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap() + chrono::Duration::days(days);
            prop_assert_eq!(
                classify(&Entry::new("x", "", None), today, retention),
                Expiry::ActiveCandidate
            );
        }
    }
}

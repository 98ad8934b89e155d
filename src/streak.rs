//! Streak calculation over journal entry dates.
//!
//! Pure date-sequence logic with no I/O: the caller supplies the set of
//! distinct entry dates (see [`crate::db::entries::entry_dates`]) and, for
//! the current streak, the reference "today" obtained once at startup.
//! A streak is a run of consecutive calendar days that each have an entry.

use chrono::{Duration, NaiveDate};

/// Sorts a copy of the dates newest-first with duplicates removed.
fn descending_distinct(dates: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}

/// Computes the streak of consecutive days ending at the most recent entry.
///
/// Returns 0 when there are no entries, and 0 when the chain is broken:
/// the most recent entry must be from today or yesterday for a streak to
/// count at all. Otherwise dates are walked newest-first, counting while
/// each date is exactly one day before the previous counted date, and the
/// count stops at the first gap.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use daybook::streak::current_streak;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let dates = vec![d(5), d(4), d(3), d(1)];
/// assert_eq!(current_streak(&dates, d(5)), 3);
/// ```
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let dates = descending_distinct(dates);
    let Some(&last) = dates.first() else {
        return 0;
    };
    if last < today - Duration::days(1) {
        return 0;
    }

    let mut streak = 0;
    let mut expected = last;
    for date in dates {
        if date == expected {
            streak += 1;
            expected = expected - Duration::days(1);
        } else {
            break;
        }
    }
    streak
}

/// Computes the longest run of consecutive days anywhere in the history.
///
/// Scans all distinct dates newest-first, incrementing a running length
/// while each date matches the expected previous day and resetting to 1 at
/// every gap; the maximum over the whole scan (including the final run) is
/// returned. 0 when there are no entries.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let dates = descending_distinct(dates);

    let mut max_streak = 0;
    let mut run = 0;
    let mut expected: Option<NaiveDate> = None;

    for date in dates {
        match expected {
            Some(e) if date != e => {
                max_streak = max_streak.max(run);
                run = 1;
            }
            _ => run += 1,
        }
        expected = Some(date - Duration::days(1));
    }

    max_streak.max(run)
}

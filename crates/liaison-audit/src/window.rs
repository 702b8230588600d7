//! Invite-code occurrence index over the audit window.

use chrono::{DateTime, Duration, Utc};

use liaison_core::types::collections::FxHashMap;
use liaison_core::types::{InviteCode, RecordId};

/// Scratch index of invite-code occurrences across the combined
/// lookback-plus-target-day window, scoped to one evaluation group.
/// Rebuilt each run and discarded at run end.
#[derive(Debug)]
pub struct WindowIndex {
    /// Occurrences per code, sorted by `(timestamp, record_id)`.
    occurrences: FxHashMap<InviteCode, Vec<(DateTime<Utc>, RecordId)>>,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
}

impl WindowIndex {
    /// Build the index from every record in the window. `day_start`
    /// and `day_end` bound the target day; entries outside them are
    /// lookback context for the cooldown rule only.
    pub fn build(
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        entries: impl IntoIterator<Item = (InviteCode, DateTime<Utc>, RecordId)>,
    ) -> Self {
        let mut occurrences: FxHashMap<InviteCode, Vec<(DateTime<Utc>, RecordId)>> =
            FxHashMap::default();
        for (code, timestamp, record_id) in entries {
            occurrences.entry(code).or_default().push((timestamp, record_id));
        }
        for list in occurrences.values_mut() {
            list.sort_unstable();
        }
        Self {
            occurrences,
            day_start,
            day_end,
        }
    }

    /// Same-day repeat rule: the first target-day appearance of a code
    /// (by `(timestamp, record_id)` order) is unflagged, every later
    /// target-day appearance repeats.
    pub fn is_same_day_repeat(
        &self,
        code: &InviteCode,
        timestamp: DateTime<Utc>,
        record_id: RecordId,
    ) -> bool {
        let Some(list) = self.occurrences.get(code) else {
            return false;
        };
        list.iter()
            .find(|(t, _)| *t >= self.day_start && *t < self.day_end)
            .is_some_and(|first| *first != (timestamp, record_id))
    }

    /// Cross-day cooldown rule: find the occurrence with the latest
    /// timestamp strictly before `timestamp` (the record itself
    /// excluded) and flag iff the gap is strictly under `cooldown`.
    /// The boundary is half-open: a gap of exactly the cooldown is
    /// not a violation.
    pub fn violates_cooldown(
        &self,
        code: &InviteCode,
        timestamp: DateTime<Utc>,
        record_id: RecordId,
        cooldown: Duration,
    ) -> bool {
        let Some(list) = self.occurrences.get(code) else {
            return false;
        };
        list.iter()
            .rev()
            .find(|(t, id)| *t < timestamp && *id != record_id)
            .is_some_and(|(prev, _)| timestamp - *prev < cooldown)
    }

    /// Number of distinct codes indexed.
    pub fn code_count(&self) -> usize {
        self.occurrences.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, h, m, 0).single().expect("valid time")
    }

    fn yesterday(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).single().expect("valid time")
    }

    fn index(entries: Vec<(&str, DateTime<Utc>, RecordId)>) -> WindowIndex {
        WindowIndex::build(
            ts(0, 0),
            Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).single().expect("valid time"),
            entries
                .into_iter()
                .map(|(c, t, id)| (InviteCode::new(c), t, id)),
        )
    }

    #[test]
    fn first_same_day_appearance_unflagged() {
        let idx = index(vec![("abc", ts(9, 0), 1), ("abc", ts(10, 0), 2)]);
        assert!(!idx.is_same_day_repeat(&InviteCode::new("abc"), ts(9, 0), 1));
        assert!(idx.is_same_day_repeat(&InviteCode::new("abc"), ts(10, 0), 2));
    }

    #[test]
    fn lookback_occurrence_does_not_count_as_same_day() {
        let idx = index(vec![("abc", yesterday(23, 0), 1), ("abc", ts(9, 0), 2)]);
        assert!(!idx.is_same_day_repeat(&InviteCode::new("abc"), ts(9, 0), 2));
    }

    #[test]
    fn cooldown_boundary_is_half_open() {
        let cooldown = Duration::hours(12);
        let code = InviteCode::new("abc");

        // 11h59m apart: violation.
        let idx = index(vec![("abc", yesterday(21, 1), 1), ("abc", ts(9, 0), 2)]);
        assert!(idx.violates_cooldown(&code, ts(9, 0), 2, cooldown));

        // Exactly 12h apart: not a violation.
        let idx = index(vec![("abc", yesterday(21, 0), 1), ("abc", ts(9, 0), 2)]);
        assert!(!idx.violates_cooldown(&code, ts(9, 0), 2, cooldown));
    }

    #[test]
    fn cooldown_uses_latest_prior_occurrence() {
        let cooldown = Duration::hours(12);
        let code = InviteCode::new("abc");
        // An old occurrence outside the cooldown plus a recent one
        // inside it: the recent one decides.
        let idx = index(vec![
            ("abc", yesterday(1, 0), 1),
            ("abc", ts(8, 0), 2),
            ("abc", ts(9, 0), 3),
        ]);
        assert!(idx.violates_cooldown(&code, ts(9, 0), 3, cooldown));
    }

    #[test]
    fn unknown_code_never_flags() {
        let idx = index(vec![("abc", ts(9, 0), 1)]);
        let other = InviteCode::new("xyz");
        assert!(!idx.is_same_day_repeat(&other, ts(10, 0), 2));
        assert!(!idx.violates_cooldown(&other, ts(10, 0), 2, Duration::hours(12)));
    }
}

use chrono::NaiveTime;

use crate::models::{AvailabilityBlock, PatientPreferences};

/// Score returned when the patient has not set a usable time preference
pub const NEUTRAL_AVAILABILITY_SCORE: f64 = 0.5;

/// Calculate availability score (0-1)
///
/// Measures how much of the patient's preferred weekly window is covered by
/// the therapist's available blocks on the same day.
///
/// - no available blocks at all => 0.0
/// - no (or a zero-length) preferred window => 0.5
/// - an inverted window (end before start) => 0.0
/// - otherwise covered minutes / preferred minutes, capped at 1.0
pub fn score_availability(
    blocks: &[AvailabilityBlock],
    preferences: Option<&PatientPreferences>,
) -> f64 {
    let available: Vec<&AvailabilityBlock> = blocks.iter().filter(|b| b.is_available).collect();
    if available.is_empty() {
        return 0.0;
    }

    let Some((day, pref_start, pref_end)) = preferences.and_then(|p| p.preferred_window()) else {
        return NEUTRAL_AVAILABILITY_SCORE;
    };

    let preferred_minutes = minutes_between(pref_start, pref_end);
    if preferred_minutes < 0.0 {
        return 0.0;
    }
    if preferred_minutes == 0.0 {
        return NEUTRAL_AVAILABILITY_SCORE;
    }

    let covered_minutes: f64 = available
        .iter()
        .filter(|b| b.day_of_week == day)
        .filter(|b| times_overlap(b.start_time, b.end_time, pref_start, pref_end))
        .map(|b| overlap_minutes(b.start_time, b.end_time, pref_start, pref_end))
        .sum();

    (covered_minutes / preferred_minutes).clamp(0.0, 1.0)
}

/// Strict half-open overlap test for `[start1, end1)` and `[start2, end2)`
#[inline]
pub fn times_overlap(start1: NaiveTime, end1: NaiveTime, start2: NaiveTime, end2: NaiveTime) -> bool {
    start1 < end2 && start2 < end1
}

/// Minutes shared by two time ranges, never negative
#[inline]
pub fn overlap_minutes(start1: NaiveTime, end1: NaiveTime, start2: NaiveTime, end2: NaiveTime) -> f64 {
    let overlap_start = start1.max(start2);
    let overlap_end = end1.min(end2);
    minutes_between(overlap_start, overlap_end).max(0.0)
}

#[inline]
fn minutes_between(start: NaiveTime, end: NaiveTime) -> f64 {
    end.signed_duration_since(start).num_seconds() as f64 / 60.0
}

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::error::ScheduleError;
use crate::models::Slot;

/// Generate the ordered slot sequence for one date. Starting at
/// `date@start_time`, each slot spans `slot_duration_minutes`; the next
/// candidate begins at the previous end plus `gap_duration_minutes`. A
/// candidate whose end would pass `date@end_time` is discarded and
/// generation stops.
pub fn generate_slots_for_time_range(
    start_time: NaiveTime,
    end_time: NaiveTime,
    slot_duration_minutes: i64,
    gap_duration_minutes: i64,
    date: NaiveDate,
) -> Vec<Slot> {
    // A non-positive step would never advance the cursor past the range end.
    if slot_duration_minutes <= 0 || slot_duration_minutes + gap_duration_minutes <= 0 {
        return Vec::new();
    }

    let range_end = date.and_time(end_time).and_utc();
    let mut current_start = date.and_time(start_time).and_utc();
    let mut slots = Vec::new();

    loop {
        let current_end = current_start + Duration::minutes(slot_duration_minutes);
        if current_end > range_end {
            break;
        }

        slots.push(Slot::available(current_start, current_end));
        current_start = current_end + Duration::minutes(gap_duration_minutes);
    }

    slots
}

/// Enumerate the end times a doctor can pick for a `start_time` with the
/// given slot and gap settings: one entry per whole number of slots,
/// stopping at the end of the civil day.
pub fn calculate_possible_end_times(
    start_time: NaiveTime,
    slot_duration_minutes: i64,
    gap_duration_minutes: i64,
) -> Vec<NaiveTime> {
    let mut possible_end_times = Vec::new();
    if slot_duration_minutes <= 0 || slot_duration_minutes + gap_duration_minutes <= 0 {
        return possible_end_times;
    }
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);

    let (mut current_end, mut wrapped) =
        start_time.overflowing_add_signed(Duration::minutes(slot_duration_minutes));

    while wrapped == 0 && current_end < end_of_day {
        possible_end_times.push(current_end);
        let step = current_end.overflowing_add_signed(Duration::minutes(
            slot_duration_minutes + gap_duration_minutes,
        ));
        current_end = step.0;
        wrapped = step.1;
    }

    possible_end_times
}

/// Contract check for callers that pre-validate a slot request: re-runs
/// the generator and confirms the last emitted slot ends at or before
/// `end_time`. The generator already guarantees this; the explicit check
/// is kept as a self-check for the validation path.
pub fn validate_time_slot_combination(
    start_time: NaiveTime,
    end_time: NaiveTime,
    slot_duration_minutes: i64,
    gap_duration_minutes: i64,
) -> Result<bool, ScheduleError> {
    let total_minutes =
        (end_time.signed_duration_since(start_time)).num_minutes();

    if total_minutes < slot_duration_minutes {
        return Err(ScheduleError::SlotTooLarge);
    }

    // Only the times matter here; the anchor date is arbitrary.
    let anchor = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let slots = generate_slots_for_time_range(
        start_time,
        end_time,
        slot_duration_minutes,
        gap_duration_minutes,
        anchor,
    );

    Ok(slots
        .last()
        .map(|slot| slot.end_time.time() <= end_time)
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    #[test]
    fn test_generates_slots_until_range_exhausted() {
        // 09:00-10:00, 20 minute slots, 5 minute gap: a third slot would
        // end at 10:10, so only two fit.
        let slots = generate_slots_for_time_range(t(9, 0), t(10, 0), 20, 5, date());

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start_time.time(), t(9, 0));
        assert_eq!(slots[0].end_time.time(), t(9, 20));
        assert_eq!(slots[1].start_time.time(), t(9, 25));
        assert_eq!(slots[1].end_time.time(), t(9, 45));
        assert!(slots.iter().all(|slot| slot.is_available));
    }

    #[test]
    fn test_zero_gap_packs_slots_back_to_back() {
        let slots = generate_slots_for_time_range(t(9, 0), t(10, 0), 30, 0, date());

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].end_time, slots[1].start_time);
    }

    #[test]
    fn test_range_too_small_yields_nothing() {
        let slots = generate_slots_for_time_range(t(9, 0), t(9, 10), 15, 0, date());
        assert!(slots.is_empty());
    }

    #[test]
    fn test_generation_is_idempotent_up_to_identity() {
        let first = generate_slots_for_time_range(t(8, 0), t(12, 0), 25, 10, date());
        let second = generate_slots_for_time_range(t(8, 0), t(12, 0), 25, 10, date());

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.start_time, b.start_time);
            assert_eq!(a.end_time, b.end_time);
            // Identities are fresh per run
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn test_possible_end_times_step_by_slot_plus_gap() {
        let ends = calculate_possible_end_times(t(9, 0), 20, 10);

        assert_eq!(ends[0], t(9, 20));
        assert_eq!(ends[1], t(9, 50));
        assert_eq!(ends[2], t(10, 20));
        // Enumeration stays within the civil day
        assert!(ends.iter().all(|end| *end < t(23, 59)));
    }

    #[test]
    fn test_possible_end_times_terminate_near_midnight() {
        let ends = calculate_possible_end_times(t(23, 30), 20, 10);
        assert_eq!(ends, vec![t(23, 50)]);
    }

    #[test]
    fn test_validate_combination_accepts_exact_fit() {
        assert_eq!(validate_time_slot_combination(t(9, 0), t(10, 0), 30, 0), Ok(true));
        assert_eq!(validate_time_slot_combination(t(9, 0), t(10, 0), 20, 5), Ok(true));
    }

    #[test]
    fn test_validate_combination_rejects_oversized_slot() {
        assert_eq!(
            validate_time_slot_combination(t(9, 0), t(9, 30), 45, 0),
            Err(ScheduleError::SlotTooLarge)
        );
    }
}

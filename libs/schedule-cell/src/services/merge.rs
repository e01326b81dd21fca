use crate::models::Slot;
use crate::services::interval::{gap_minutes, overlaps};

/// Merge newly generated slots into a day's existing slots.
///
/// Both inputs must be sorted ascending by start time and internally
/// non-overlapping. Existing slots are carried over unchanged; an
/// incoming slot is accepted only if it overlaps no existing slot and
/// keeps at least `required_gap_minutes` from its existing neighbors and
/// from the most recently accepted slot. Ties on start time resolve in
/// favor of the existing slot.
///
/// Single forward sweep over the two sequences, linear in
/// `existing.len() + incoming.len()`.
pub fn merge(existing: &[Slot], incoming: &[Slot], required_gap_minutes: i64) -> Vec<Slot> {
    let mut result: Vec<Slot> = Vec::with_capacity(existing.len() + incoming.len());
    let mut i = 0;
    let mut j = 0;

    while i < existing.len() && j < incoming.len() {
        let current = &existing[i];
        let candidate = &incoming[j];

        if current.start_time < candidate.start_time {
            result.push(current.clone());
            i += 1;
            continue;
        }

        // Candidate starts at or before existing[i]: it competes with the
        // surrounding existing slots before it may be accepted.
        let previous = i.checked_sub(1).map(|index| &existing[index]);

        let overlaps_neighbor = slots_overlap(candidate, current)
            || previous.is_some_and(|slot| slots_overlap(candidate, slot));
        if overlaps_neighbor {
            j += 1;
            continue;
        }

        let gap_violation = insufficient_gap(candidate, current, required_gap_minutes)
            || previous
                .is_some_and(|slot| insufficient_gap(candidate, slot, required_gap_minutes))
            || result
                .last()
                .is_some_and(|slot| insufficient_gap(candidate, slot, required_gap_minutes));
        if gap_violation {
            j += 1;
            continue;
        }

        result.push(candidate.clone());
        j += 1;
    }

    while i < existing.len() {
        result.push(existing[i].clone());
        i += 1;
    }

    while j < incoming.len() {
        let candidate = &incoming[j];
        j += 1;

        if let Some(last) = result.last() {
            if slots_overlap(candidate, last)
                || insufficient_gap(candidate, last, required_gap_minutes)
            {
                continue;
            }
        }

        result.push(candidate.clone());
    }

    result
}

fn slots_overlap(a: &Slot, b: &Slot) -> bool {
    overlaps(a.start_time, a.end_time, b.start_time, b.end_time)
}

fn insufficient_gap(a: &Slot, b: &Slot, required_gap_minutes: i64) -> bool {
    gap_minutes(a.start_time, a.end_time, b.start_time, b.end_time)
        .is_some_and(|gap| gap < required_gap_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, hour, minute, 0).unwrap()
    }

    fn available(start: (u32, u32), end: (u32, u32)) -> Slot {
        Slot::available(at(start.0, start.1), at(end.0, end.1))
    }

    fn booked(start: (u32, u32), end: (u32, u32)) -> Slot {
        let mut slot = available(start, end);
        slot.book(Uuid::new_v4());
        slot
    }

    fn starts(slots: &[Slot]) -> Vec<DateTime<Utc>> {
        slots.iter().map(|slot| slot.start_time).collect()
    }

    #[test]
    fn test_incoming_overlapping_booked_slot_is_discarded() {
        let existing = vec![booked((10, 0), (10, 20))];
        let incoming = vec![available((10, 15), (10, 35))];

        let merged = merge(&existing, &incoming, 5);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, existing[0].id);
        assert!(!merged[0].is_available);
    }

    #[test]
    fn test_incoming_with_insufficient_gap_is_discarded() {
        let existing = vec![available((9, 0), (9, 20))];
        let incoming = vec![available((9, 25), (9, 45))];

        // Gap of 5 minutes is below the required 10
        let merged = merge(&existing, &incoming, 10);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, existing[0].id);
    }

    #[test]
    fn test_disjoint_sequences_interleave_sorted() {
        let existing = vec![available((9, 0), (9, 20)), available((11, 0), (11, 20))];
        let incoming = vec![available((10, 0), (10, 20)), available((12, 0), (12, 20))];

        let merged = merge(&existing, &incoming, 10);

        assert_eq!(
            starts(&merged),
            vec![at(9, 0), at(10, 0), at(11, 0), at(12, 0)]
        );
    }

    #[test]
    fn test_every_existing_slot_survives_unchanged() {
        let existing = vec![
            booked((9, 0), (9, 30)),
            available((10, 0), (10, 30)),
            available((11, 0), (11, 30)),
        ];
        let incoming = vec![
            available((8, 0), (8, 30)),
            available((9, 15), (9, 45)),
            available((10, 45), (11, 15)),
        ];

        let merged = merge(&existing, &incoming, 0);

        for slot in &existing {
            let kept = merged.iter().find(|candidate| candidate.id == slot.id);
            let kept = kept.expect("existing slot dropped by merge");
            assert_eq!(kept.start_time, slot.start_time);
            assert_eq!(kept.end_time, slot.end_time);
            assert_eq!(kept.is_available, slot.is_available);
        }
    }

    #[test]
    fn test_result_is_sorted_and_non_overlapping() {
        let existing = vec![available((9, 0), (9, 30)), available((12, 0), (12, 30))];
        let incoming = vec![
            // 5 minutes after the first existing slot: below the gap
            available((9, 35), (10, 5)),
            available((10, 10), (10, 40)),
            // Overlaps the second existing slot
            available((11, 55), (12, 25)),
            available((13, 0), (13, 30)),
        ];

        let merged = merge(&existing, &incoming, 10);

        assert_eq!(
            starts(&merged),
            vec![at(9, 0), at(10, 10), at(12, 0), at(13, 0)]
        );
        for window in merged.windows(2) {
            assert!(window[0].start_time < window[1].start_time);
            assert!(window[0].end_time <= window[1].start_time);
        }
    }

    #[test]
    fn test_gap_enforced_against_previously_accepted_incoming() {
        let existing = vec![available((9, 0), (9, 20))];
        let incoming = vec![
            available((9, 40), (10, 0)),
            // 10 minutes after the slot accepted just above: below gap 15
            available((10, 10), (10, 30)),
        ];

        let merged = merge(&existing, &incoming, 15);

        assert_eq!(starts(&merged), vec![at(9, 0), at(9, 40)]);
    }

    #[test]
    fn test_identical_start_resolves_to_existing() {
        let existing = vec![booked((10, 0), (10, 30))];
        let incoming = vec![available((10, 0), (10, 30))];

        let merged = merge(&existing, &incoming, 0);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, existing[0].id);
    }

    #[test]
    fn test_merge_into_empty_day() {
        let incoming = vec![available((9, 0), (9, 20)), available((9, 30), (9, 50))];

        let merged = merge(&[], &incoming, 10);

        assert_eq!(starts(&merged), vec![at(9, 0), at(9, 30)]);
    }
}

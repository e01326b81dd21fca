use chrono::{DateTime, Utc};

/// Half-open interval overlap: touching endpoints do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Minute gap between two disjoint intervals, in either order. `None`
/// when the intervals overlap: overlap is reported separately and never
/// conflated with an insufficient gap.
pub fn gap_minutes(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> Option<i64> {
    if a_end <= b_start {
        Some((b_start - a_end).num_minutes())
    } else if b_end <= a_start {
        Some((a_start - b_end).num_minutes())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_overlapping_intervals() {
        assert!(overlaps(at(10, 0), at(10, 30), at(10, 15), at(10, 45)));
        assert!(overlaps(at(10, 15), at(10, 45), at(10, 0), at(10, 30)));
        // Full containment
        assert!(overlaps(at(10, 0), at(11, 0), at(10, 15), at(10, 30)));
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        assert!(!overlaps(at(10, 0), at(10, 30), at(10, 30), at(11, 0)));
        assert!(!overlaps(at(10, 30), at(11, 0), at(10, 0), at(10, 30)));
    }

    #[test]
    fn test_gap_between_disjoint_intervals() {
        assert_eq!(
            gap_minutes(at(10, 0), at(10, 20), at(10, 25), at(10, 45)),
            Some(5)
        );
        // Order independent
        assert_eq!(
            gap_minutes(at(10, 25), at(10, 45), at(10, 0), at(10, 20)),
            Some(5)
        );
        // Touching endpoints have a zero gap
        assert_eq!(
            gap_minutes(at(10, 0), at(10, 20), at(10, 20), at(10, 40)),
            Some(0)
        );
    }

    #[test]
    fn test_gap_not_applicable_for_overlap() {
        assert_eq!(gap_minutes(at(10, 0), at(10, 30), at(10, 15), at(10, 45)), None);
    }
}

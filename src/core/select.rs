use crate::types::SceneRecord;
use chrono::{DateTime, Utc};

/// Absolute gap in seconds between a record's acquisition and the target.
///
/// Records without an acquisition instant get the maximum gap so they rank
/// behind every timed record.
fn acquisition_gap(record: &SceneRecord, target: DateTime<Utc>) -> i64 {
    match record.acquired {
        Some(t) => (t - target).num_seconds().abs(),
        None => i64::MAX,
    }
}

/// Pick the record acquired closest in time to `target`.
///
/// Ties keep the earliest record in catalog response order. Returns `None`
/// for an empty candidate list.
pub fn select_nearest(records: &[SceneRecord], target: DateTime<Utc>) -> Option<&SceneRecord> {
    records.iter().min_by_key(|r| acquisition_gap(r, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn scene(id: &str, acquired: Option<DateTime<Utc>>) -> SceneRecord {
        SceneRecord {
            id: id.to_string(),
            acquired,
            assets: HashMap::new(),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_nearest_by_absolute_gap() {
        let records = vec![
            scene("far-before", Some(at(20, 0))),
            scene("near-after", Some(at(2, 6))),
            scene("far-after", Some(at(9, 0))),
        ];
        let selected = select_nearest(&records, at(1, 0)).unwrap();
        assert_eq!(selected.id, "near-after");
    }

    #[test]
    fn test_gap_is_symmetric_around_target() {
        // 24 h after beats 47 h before
        let records = vec![
            scene("before", Some(at(1, 1))),
            scene("after", Some(at(4, 0))),
        ];
        let selected = select_nearest(&records, at(3, 0)).unwrap();
        assert_eq!(selected.id, "after");
    }

    #[test]
    fn test_tie_keeps_response_order() {
        // both 24 h away from the target
        let records = vec![
            scene("first", Some(at(1, 0))),
            scene("second", Some(at(3, 0))),
        ];
        let selected = select_nearest(&records, at(2, 0)).unwrap();
        assert_eq!(selected.id, "first");
    }

    #[test]
    fn test_untimed_record_never_beats_timed() {
        let records = vec![
            scene("untimed", None),
            scene("timed", Some(at(30, 23))),
        ];
        let selected = select_nearest(&records, at(1, 0)).unwrap();
        assert_eq!(selected.id, "timed");
    }

    #[test]
    fn test_all_untimed_falls_back_to_first() {
        let records = vec![scene("a", None), scene("b", None)];
        let selected = select_nearest(&records, at(1, 0)).unwrap();
        assert_eq!(selected.id, "a");
    }

    #[test]
    fn test_empty_input_selects_nothing() {
        assert!(select_nearest(&[], at(1, 0)).is_none());
    }
}

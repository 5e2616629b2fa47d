//! The Gap Analyzer (C2): sweeps a sorted list of immutable blocks for a day
//! and emits the free intervals between them, including the bracket gaps
//! before the first block (after wake) and after the last (before sleep).

use crate::models::{Block, Gap};

/// Input blocks are assumed disjoint and pre-sorted by start -- overlaps are
/// a caller bug, not a condition this function detects.
pub fn find_gaps(blocks: &[Block], wake: chrono::NaiveDateTime, sleep: chrono::NaiveDateTime) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut cursor = wake;

    for block in blocks {
        if block.start > cursor {
            push_gap_if_meaningful(&mut gaps, cursor, block.start);
        }
        if block.end > cursor {
            cursor = block.end;
        }
    }

    if sleep > cursor {
        push_gap_if_meaningful(&mut gaps, cursor, sleep);
    }

    gaps
}

fn push_gap_if_meaningful(gaps: &mut Vec<Gap>, start: chrono::NaiveDateTime, end: chrono::NaiveDateTime) {
    if (end - start).num_minutes() >= 1 {
        gaps.push(Gap::new(start, end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityType;
    use chrono::NaiveDate;

    fn dt(hour: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(hour, min, 0).unwrap()
    }

    fn block(start: chrono::NaiveDateTime, end: chrono::NaiveDateTime) -> Block {
        Block {
            start,
            end,
            activity_type: ActivityType::University,
            energy_level: 5,
            label: None,
            task_id: None,
        }
    }

    #[test]
    fn emits_bracket_and_interior_gaps() {
        let blocks = vec![block(dt(9, 0), dt(10, 0)), block(dt(11, 0), dt(12, 0))];
        let gaps = find_gaps(&blocks, dt(7, 0), dt(23, 0));

        assert_eq!(gaps.len(), 3);
        assert_eq!(gaps[0].start, dt(7, 0));
        assert_eq!(gaps[0].end, dt(9, 0));
        assert_eq!(gaps[1].start, dt(10, 0));
        assert_eq!(gaps[1].end, dt(11, 0));
        assert_eq!(gaps[2].start, dt(12, 0));
        assert_eq!(gaps[2].end, dt(23, 0));
    }

    #[test]
    fn back_to_back_blocks_produce_no_gap() {
        let blocks = vec![block(dt(9, 0), dt(10, 0)), block(dt(10, 0), dt(11, 0))];
        let gaps = find_gaps(&blocks, dt(9, 0), dt(11, 0));
        assert!(gaps.is_empty());
    }

    #[test]
    fn sub_minute_residue_is_not_emitted() {
        let blocks = vec![block(dt(9, 0), dt(10, 0))];
        let wake = dt(8, 59);
        let sleep = dt(10, 0);
        let gaps = find_gaps(&blocks, wake, sleep);
        assert!(gaps.is_empty());
    }
}

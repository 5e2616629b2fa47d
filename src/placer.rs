//! The Placer/Optimizer (C5) -- the hardest subsystem. Places pending work
//! into the free gaps of a day budget under priority, deadline, energy, and
//! duration constraints. Deterministic: identical input state always
//! produces byte-identical placement decisions.

use crate::energy::EnergyModel;
use crate::models::{Gap, GapClassification};

pub const PRIORITY_OVERDUE: i64 = 100;
pub const PRIORITY_DUE_TODAY: i64 = 90;
pub const PRIORITY_EXAM_PREP: i64 = 85;
pub const PRIORITY_URGENT_LAB: i64 = 75;
pub const PRIORITY_REVISION_DUE: i64 = 65;
pub const PRIORITY_ASSIGNMENT: i64 = 60;
pub const PRIORITY_REGULAR_STUDY: i64 = 50;
pub const PRIORITY_FREE_TIME: i64 = 10;

/// How a pending item pairs with the energy model, for `match_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectAffinity {
    ConceptHeavy,
    PracticeHeavy,
    Neutral,
}

/// One unit of work waiting to be placed -- an unplaced task, a due
/// revision, urgent lab prep, or an exam-prep request, normalized to the
/// fields the Placer needs. Built by the caller (the operations layer) from
/// whichever Store table the item actually lives in.
#[derive(Debug, Clone)]
pub struct PendingItem {
    pub id: i64,
    pub priority: i64,
    pub subject_credits: i64,
    pub deadline: Option<chrono::NaiveDateTime>,
    pub duration_mins: i64,
    pub wants_deep_work: bool,
    pub affinity: SubjectAffinity,
}

impl PendingItem {
    /// Stable sort key: priority desc, then `subject.credits` desc, then
    /// earliest deadline, then longer `duration_mins` first.
    fn sort_key(&self) -> (std::cmp::Reverse<i64>, std::cmp::Reverse<i64>, i64, std::cmp::Reverse<i64>) {
        let deadline_rank = self.deadline.map(|d| d.and_utc().timestamp()).unwrap_or(i64::MAX);
        (
            std::cmp::Reverse(self.priority),
            std::cmp::Reverse(self.subject_credits),
            deadline_rank,
            std::cmp::Reverse(self.duration_mins),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Placement {
    pub item_id: i64,
    pub start: chrono::NaiveDateTime,
    pub end: chrono::NaiveDateTime,
}

#[derive(Debug, Clone)]
pub enum PlacementFailure {
    Unschedulable { item_id: i64, reason: String },
}

pub struct Placer<'a> {
    energy: &'a EnergyModel<'a>,
    min_break_after_study: i64,
}

impl<'a> Placer<'a> {
    pub fn new(energy: &'a EnergyModel<'a>, min_break_after_study: i64) -> Self {
        Placer { energy, min_break_after_study }
    }

    /// `match_score` for placing `item` into `gap`, trading off deep-work
    /// fit, the item's affinity against the configured energy curve's own
    /// morning/evening peaks, and deadline urgency.
    fn match_score(&self, item: &PendingItem, gap: &Gap) -> i64 {
        let mut score = 0;
        if item.wants_deep_work && gap.classification == GapClassification::DeepWork {
            score += 20;
        }

        let hour = gap.start.time().hour() as u32;
        let morning_peak = self.energy.is_morning_peak(hour);
        let evening_peak = self.energy.is_evening_peak(hour);

        match item.affinity {
            SubjectAffinity::ConceptHeavy if morning_peak => score += 20,
            SubjectAffinity::PracticeHeavy if evening_peak => score += 20,
            SubjectAffinity::ConceptHeavy if evening_peak => score -= 10,
            SubjectAffinity::PracticeHeavy if morning_peak => score -= 10,
            _ => {}
        }

        if let Some(deadline) = item.deadline {
            let days_until_deadline = (deadline.date() - gap.start.date()).num_days().max(0);
            score += 2 * days_until_deadline;
        }

        score
    }

    /// Attempts to place every item in `items` (already the caller's
    /// priority-sorted pending set for one day) into `gaps`, committing each
    /// placement before considering the next item. `gaps` shrinks as items
    /// consume capacity; overlap with routine/timetable boundaries is
    /// impossible by construction since gaps never cross them.
    pub fn place_day(
        &self,
        items: &[PendingItem],
        gaps: &[Gap],
    ) -> (Vec<Placement>, Vec<PlacementFailure>) {
        let mut sorted_items = items.to_vec();
        sorted_items.sort_by_key(PendingItem::sort_key);

        let mut remaining_gaps = gaps.to_vec();
        remaining_gaps.sort_by_key(|gap| gap.start);

        let mut placements = Vec::new();
        let mut failures = Vec::new();

        for item in &sorted_items {
            let candidate = remaining_gaps
                .iter()
                .enumerate()
                .filter(|(_, gap)| gap.duration_mins >= item.duration_mins)
                .max_by_key(|(_, gap)| (self.match_score(item, gap), std::cmp::Reverse(gap.start)));

            let Some((index, gap)) = candidate else {
                failures.push(PlacementFailure::Unschedulable {
                    item_id: item.id,
                    reason: "no gap large enough for this item's duration".into(),
                });
                continue;
            };

            let start = gap.start;
            let end = start + chrono::Duration::minutes(item.duration_mins);
            placements.push(Placement { item_id: item.id, start, end });

            let slack = if item.duration_mins >= 90 { self.min_break_after_study } else { 0 };
            let consumed_end = end + chrono::Duration::minutes(slack);

            let gap = remaining_gaps[index].clone();
            remaining_gaps.remove(index);
            if consumed_end < gap.end {
                remaining_gaps.push(Gap::new(consumed_end, gap.end));
            }
            remaining_gaps.sort_by_key(|gap| gap.start);
        }

        (placements, failures)
    }
}

use chrono::Timelike;

/// Backward planning: distributes `hours_needed` across
/// `[now_date, deadline_date)` with a linear ramp toward the deadline --
/// day `i` gets fraction `(i+1) / sum(j+1 for j in days)`.
pub fn backward_plan_allocation_mins(hours_needed: f64, day_count: i64) -> Vec<i64> {
    if day_count <= 0 {
        return Vec::new();
    }
    let total_weight: i64 = (1..=day_count).sum();
    let total_mins = (hours_needed * 60.0).round() as i64;

    let mut allocations: Vec<i64> = (1..=day_count)
        .map(|day_index| total_mins * day_index / total_weight)
        .collect();

    let allocated: i64 = allocations.iter().sum();
    let remainder = total_mins - allocated;
    if let Some(last) = allocations.last_mut() {
        *last += remainder;
    }
    allocations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn sort_key_orders_by_priority_then_credits_then_deadline_then_duration() {
        let high_priority = PendingItem {
            id: 1,
            priority: PRIORITY_OVERDUE,
            subject_credits: 3,
            deadline: None,
            duration_mins: 60,
            wants_deep_work: false,
            affinity: SubjectAffinity::Neutral,
        };
        let low_priority = PendingItem {
            id: 2,
            priority: PRIORITY_REGULAR_STUDY,
            subject_credits: 4,
            deadline: None,
            duration_mins: 60,
            wants_deep_work: false,
            affinity: SubjectAffinity::Neutral,
        };
        let mut items = vec![low_priority.clone(), high_priority.clone()];
        items.sort_by_key(PendingItem::sort_key);
        assert_eq!(items[0].id, high_priority.id);
    }

    #[test]
    fn deep_work_item_prefers_deep_work_gap() {
        let curve = crate::config::EnergyCurve::default_curve();
        let energy = EnergyModel::new(&curve);
        let placer = Placer::new(&energy, 15);

        let item = PendingItem {
            id: 1,
            priority: PRIORITY_REGULAR_STUDY,
            subject_credits: 3,
            deadline: None,
            duration_mins: 60,
            wants_deep_work: true,
            affinity: SubjectAffinity::Neutral,
        };
        let gaps = vec![Gap::new(dt(1, 8), dt(1, 9)), Gap::new(dt(1, 12), dt(1, 14))];

        let (placements, failures) = placer.place_day(&[item], &gaps);
        assert!(failures.is_empty());
        assert_eq!(placements[0].start, dt(1, 12));
    }

    #[test]
    fn item_larger_than_every_gap_is_unschedulable() {
        let curve = crate::config::EnergyCurve::default_curve();
        let energy = EnergyModel::new(&curve);
        let placer = Placer::new(&energy, 15);

        let item = PendingItem {
            id: 1,
            priority: PRIORITY_OVERDUE,
            subject_credits: 3,
            deadline: None,
            duration_mins: 180,
            wants_deep_work: false,
            affinity: SubjectAffinity::Neutral,
        };
        let gaps = vec![Gap::new(dt(1, 8), dt(1, 9))];

        let (placements, failures) = placer.place_day(&[item], &gaps);
        assert!(placements.is_empty());
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn backward_plan_ramps_up_toward_deadline() {
        let allocations = backward_plan_allocation_mins(10.0, 4);
        assert_eq!(allocations.len(), 4);
        assert_eq!(allocations.iter().sum::<i64>(), 600);
        assert!(allocations[3] > allocations[0]);
    }

    #[test]
    fn backward_plan_is_deterministic() {
        let first = backward_plan_allocation_mins(7.5, 5);
        let second = backward_plan_allocation_mins(7.5, 5);
        assert_eq!(first, second);
    }
}

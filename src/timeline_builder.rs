//! The Timeline Builder (C3): composes a full-day block sequence from
//! routines, the fixed timetable, placed tasks, and the gaps between them.

use chrono::Timelike;

use crate::config::{Config, DayOfWeek};
use crate::energy::EnergyModel;
use crate::gap_analyzer::find_gaps;
use crate::models::{ActivityType, Block, Task, TaskType, Timeline};

pub struct TimelineBuilder<'a> {
    config: &'a Config,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        TimelineBuilder { config }
    }

    /// Builds the day's full 24h timeline. `placed_tasks` must already be
    /// filtered to those whose `scheduled_start` falls on `date`.
    pub fn build(&self, date: chrono::NaiveDate, placed_tasks: &[Task]) -> Timeline {
        let routine = &self.config.routine;
        let energy = EnergyModel::new(&self.config.energy_curve);

        let day_start = date.and_time(chrono::NaiveTime::MIN);
        let next_day_start = (date + chrono::Duration::days(1)).and_time(chrono::NaiveTime::MIN);
        let wake = date.and_time(routine.sleep_end);
        let sleep = if routine.sleep_start >= routine.sleep_end {
            date.and_time(routine.sleep_start)
        } else {
            (date + chrono::Duration::days(1)).and_time(routine.sleep_start)
        };

        let mut immutable = Vec::new();

        // 1. Sleep blocks book-end the day: last night's sleep tailing into
        // this morning's wake, and tonight's bedtime leading into tomorrow.
        if wake > day_start {
            immutable.push(raw_block(day_start, wake, ActivityType::Sleep));
        }
        if sleep < next_day_start {
            immutable.push(raw_block(sleep, next_day_start, ActivityType::Sleep));
        }

        // 2. Wake routine and meal windows.
        let wake_routine_end = wake + chrono::Duration::minutes(routine.wake_routine_mins);
        immutable.push(raw_block(wake, wake_routine_end, ActivityType::WakeRoutine));
        immutable.push(raw_block(
            date.and_time(routine.breakfast_time),
            date.and_time(routine.breakfast_time) + chrono::Duration::minutes(routine.breakfast_mins),
            ActivityType::Breakfast,
        ));
        immutable.push(raw_block(
            date.and_time(routine.lunch_time),
            date.and_time(routine.lunch_time) + chrono::Duration::minutes(routine.lunch_mins),
            ActivityType::Lunch,
        ));
        immutable.push(raw_block(
            date.and_time(routine.dinner_time),
            date.and_time(routine.dinner_time) + chrono::Duration::minutes(routine.dinner_mins),
            ActivityType::Dinner,
        ));

        // 3. Timetable entries for the day.
        let weekday = DayOfWeek::from_chrono(date.weekday());
        for class in self.config.timetable.classes_on(weekday) {
            immutable.push(raw_block(
                date.and_time(class.start),
                date.and_time(class.end),
                ActivityType::University,
            ));
        }

        // 4. Placed tasks scheduled for this date.
        for task in placed_tasks {
            if let (Some(start), Some(end)) = (task.scheduled_start, task.scheduled_end) {
                immutable.push(Block {
                    start,
                    end,
                    activity_type: activity_type_for_task(task, &self.config.routine),
                    energy_level: 0,
                    label: Some(task.title.clone()),
                    task_id: Some(task.id),
                });
            }
        }

        immutable.retain(|block| block.activity_type == ActivityType::Sleep || (block.end > wake && block.start < sleep));
        immutable.sort_by_key(|block| block.start);

        // 5. Gaps become free_time blocks.
        let gaps = find_gaps(&immutable, wake, sleep);
        for gap in gaps {
            immutable.push(raw_block(gap.start, gap.end, ActivityType::FreeTime));
        }
        immutable.sort_by_key(|block| block.start);

        // 6. Annotate every block with its energy level.
        for block in &mut immutable {
            block.energy_level = energy.level_at(block.start);
        }

        Timeline { date, blocks: immutable }
    }
}

fn raw_block(start: chrono::NaiveDateTime, end: chrono::NaiveDateTime, activity_type: ActivityType) -> Block {
    Block {
        start,
        end,
        activity_type,
        energy_level: 0,
        label: None,
        task_id: None,
    }
}

fn activity_type_for_task(task: &Task, routine: &crate::config::DailyRoutineConfig) -> ActivityType {
    if task.is_deep_work || task.duration_mins >= routine.deep_work_min_duration {
        return ActivityType::DeepWork;
    }
    match task.task_type {
        TaskType::Study => ActivityType::Study,
        TaskType::Revision => ActivityType::Revision,
        TaskType::Practice => ActivityType::Practice,
        TaskType::Assignment => ActivityType::Assignment,
        TaskType::LabWork => ActivityType::LabWork,
        TaskType::Break => ActivityType::Break,
        TaskType::FreeTime => ActivityType::FreeTime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_produces_contiguous_partition_with_no_placed_tasks() {
        let config = Config::default();
        let builder = TimelineBuilder::new(&config);
        let date = chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let timeline = builder.build(date, &[]);

        assert!(timeline.is_contiguous_partition());
        assert_eq!(timeline.total_duration_mins(), 24 * 60);
    }

    #[test]
    fn sleep_blocks_book_end_the_day() {
        let config = Config::default();
        let builder = TimelineBuilder::new(&config);
        let date = chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let timeline = builder.build(date, &[]);

        let first = timeline.blocks.first().unwrap();
        let last = timeline.blocks.last().unwrap();
        assert_eq!(first.activity_type, ActivityType::Sleep);
        assert_eq!(first.start, date.and_time(chrono::NaiveTime::MIN));
        assert_eq!(last.activity_type, ActivityType::Sleep);
        assert_eq!(last.end, (date + chrono::Duration::days(1)).and_time(chrono::NaiveTime::MIN));
    }
}

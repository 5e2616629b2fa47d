//! TOML-based application configuration.
//!
//! Stores the routine skeleton, the weekly class timetable, the energy
//! curve, and notification preferences. Loaded from and persisted to
//! `~/.config/study-timeline-engine/config.toml`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::{NotificationPreference, NotificationType};

fn config_dir() -> CoreResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("study-timeline-engine"))
        .ok_or_else(|| CoreError::precondition("no config directory available on this platform"))
}

fn config_path() -> CoreResult<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn default_sleep_start() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap()
}
fn default_sleep_end() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(7, 0, 0).unwrap()
}
fn default_wake_routine_mins() -> i64 {
    30
}
fn default_breakfast_time() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(7, 30, 0).unwrap()
}
fn default_meal_mins() -> i64 {
    30
}
fn default_lunch_time() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(13, 0, 0).unwrap()
}
fn default_dinner_time() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(19, 30, 0).unwrap()
}
fn default_max_study_block_mins() -> i64 {
    90
}
fn default_min_break_after_study() -> i64 {
    15
}
fn default_deep_work_min_duration() -> i64 {
    90
}

/// Routine skeleton feeding the Timeline Builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRoutineConfig {
    #[serde(default = "default_sleep_start")]
    pub sleep_start: chrono::NaiveTime,
    #[serde(default = "default_sleep_end")]
    pub sleep_end: chrono::NaiveTime,
    #[serde(default = "default_wake_routine_mins")]
    pub wake_routine_mins: i64,
    #[serde(default = "default_breakfast_time")]
    pub breakfast_time: chrono::NaiveTime,
    #[serde(default = "default_meal_mins")]
    pub breakfast_mins: i64,
    #[serde(default = "default_lunch_time")]
    pub lunch_time: chrono::NaiveTime,
    #[serde(default = "default_meal_mins")]
    pub lunch_mins: i64,
    #[serde(default = "default_dinner_time")]
    pub dinner_time: chrono::NaiveTime,
    #[serde(default = "default_meal_mins")]
    pub dinner_mins: i64,
    #[serde(default = "default_max_study_block_mins")]
    pub max_study_block_mins: i64,
    #[serde(default = "default_min_break_after_study")]
    pub min_break_after_study: i64,
    #[serde(default = "default_deep_work_min_duration")]
    pub deep_work_min_duration: i64,
}

impl Default for DailyRoutineConfig {
    fn default() -> Self {
        DailyRoutineConfig {
            sleep_start: default_sleep_start(),
            sleep_end: default_sleep_end(),
            wake_routine_mins: default_wake_routine_mins(),
            breakfast_time: default_breakfast_time(),
            breakfast_mins: default_meal_mins(),
            lunch_time: default_lunch_time(),
            lunch_mins: default_meal_mins(),
            dinner_time: default_dinner_time(),
            dinner_mins: default_meal_mins(),
            max_study_block_mins: default_max_study_block_mins(),
            min_break_after_study: default_min_break_after_study(),
            deep_work_min_duration: default_deep_work_min_duration(),
        }
    }
}

/// Hour-of-day (0-23) -> integer energy level (1-10), piecewise constant.
/// Stored sparse; hours not present inherit the nearest preceding entry,
/// wrapping from hour 23 back to the entry at hour 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyCurve {
    levels: BTreeMap<u8, u8>,
}

impl EnergyCurve {
    /// The default curve: peaks 08-10 (9-10), dips 12-13 (4-6),
    /// second peak 15-17 (7-8), declines through evening.
    pub fn default_curve() -> Self {
        let mut levels = BTreeMap::new();
        levels.insert(0, 3);
        levels.insert(6, 5);
        levels.insert(8, 9);
        levels.insert(11, 10);
        levels.insert(12, 5);
        levels.insert(14, 6);
        levels.insert(15, 8);
        levels.insert(18, 6);
        levels.insert(21, 4);
        EnergyCurve { levels }
    }

    pub fn energy_at(&self, hour: u8) -> u8 {
        self.levels
            .range(..=hour)
            .next_back()
            .map(|(_, level)| *level)
            .or_else(|| self.levels.values().next_back().copied())
            .unwrap_or(5)
    }

    pub fn set(&mut self, hour: u8, level: u8) {
        self.levels.insert(hour, level);
    }
}

impl Default for EnergyCurve {
    fn default() -> Self {
        Self::default_curve()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    Lecture,
    Lab,
    Tutorial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub start: chrono::NaiveTime,
    pub end: chrono::NaiveTime,
    pub subject: String,
    pub class_type: ClassType,
    pub room: String,
}

/// The fixed weekly timetable. Keyed by day name
/// (not the `DayOfWeek` enum directly) since TOML tables require string keys.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KUTimetable {
    days: BTreeMap<String, Vec<Class>>,
}

impl KUTimetable {
    fn key(day: DayOfWeek) -> &'static str {
        match day {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn classes_on(&self, day: DayOfWeek) -> &[Class] {
        self.days.get(Self::key(day)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_day(&mut self, day: DayOfWeek, classes: Vec<Class>) {
        self.days.insert(Self::key(day).to_string(), classes);
    }
}

/// Top-level configuration, serialized to/from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routine: DailyRoutineConfig,
    #[serde(default = "EnergyCurve::default_curve")]
    pub energy_curve: EnergyCurve,
    #[serde(default)]
    pub timetable: KUTimetable,
    #[serde(default = "default_notification_preferences")]
    pub notification_preferences: Vec<NotificationPreference>,
}

fn default_notification_preferences() -> Vec<NotificationPreference> {
    NotificationType::all()
        .into_iter()
        .map(NotificationPreference::default_for)
        .collect()
}

impl Config {
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn load() -> CoreResult<Self> {
        let path = config_path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|err| {
                CoreError::precondition(format!("malformed config at {}: {err}", path.display()))
            }),
            Err(_) => {
                let config = Config::default();
                config.save()?;
                Ok(config)
            }
        }
    }

    pub fn save(&self) -> CoreResult<()> {
        let dir = config_dir()?;
        std::fs::create_dir_all(&dir)
            .map_err(|err| CoreError::precondition(format!("cannot create config dir: {err}")))?;
        let content = toml::to_string_pretty(self)
            .map_err(|err| CoreError::precondition(format!("cannot serialize config: {err}")))?;
        std::fs::write(dir.join("config.toml"), content)
            .map_err(|err| CoreError::precondition(format!("cannot write config: {err}")))?;
        Ok(())
    }
}

/// Subject code naming rule: `[A-Z]{2,5}[0-9]{3}`.
pub fn subject_code_is_valid(code: &str) -> bool {
    let bytes = code.as_bytes();
    let letters = bytes.iter().take_while(|b| b.is_ascii_uppercase()).count();
    if !(2..=5).contains(&letters) {
        return false;
    }
    let digits = &bytes[letters..];
    digits.len() == 3 && digits.iter().all(u8::is_ascii_digit)
}

/// Chapter slug naming rule: `chapter[0-9]{2}`.
pub fn chapter_slug_is_valid(slug: &str) -> bool {
    slug.strip_prefix("chapter")
        .map(|rest| rest.len() == 2 && rest.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_curve_inherits_nearest_preceding_entry() {
        let curve = EnergyCurve::default_curve();
        assert_eq!(curve.energy_at(9), 9);
        assert_eq!(curve.energy_at(13), 5);
        assert_eq!(curve.energy_at(16), 8);
        assert_eq!(curve.energy_at(23), 4);
    }

    #[test]
    fn subject_code_naming_rule() {
        assert!(subject_code_is_valid("MATH101"));
        assert!(subject_code_is_valid("CS100"));
        assert!(!subject_code_is_valid("math101"));
        assert!(!subject_code_is_valid("MATHEMATICS101"));
        assert!(!subject_code_is_valid("MA10"));
    }

    #[test]
    fn chapter_slug_naming_rule() {
        assert!(chapter_slug_is_valid("chapter01"));
        assert!(!chapter_slug_is_valid("chapter1"));
        assert!(!chapter_slug_is_valid("Chapter01"));
    }

    #[test]
    fn default_config_roundtrips_through_toml() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.routine.max_study_block_mins, 90);
        assert_eq!(parsed.notification_preferences.len(), 7);
    }
}

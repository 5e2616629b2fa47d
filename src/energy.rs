//! The Energy Model (C4): wraps the configured [`EnergyCurve`] to answer
//! "what energy level, and what time-of-day bucket, does this hour have".

use crate::config::EnergyCurve;
use crate::models::TimeOfDay;

pub struct EnergyModel<'a> {
    curve: &'a EnergyCurve,
}

impl<'a> EnergyModel<'a> {
    pub fn new(curve: &'a EnergyCurve) -> Self {
        EnergyModel { curve }
    }

    pub fn level_at(&self, at: chrono::NaiveDateTime) -> u8 {
        self.curve.energy_at(at.hour() as u8)
    }

    pub fn time_of_day(&self, at: chrono::NaiveDateTime) -> TimeOfDay {
        TimeOfDay::from_hour(at.hour())
    }

    /// The highest level the curve reaches across `hours`.
    fn peak_level_over(&self, hours: std::ops::Range<u8>) -> u8 {
        hours.map(|hour| self.curve.energy_at(hour)).max().unwrap_or(0)
    }

    /// Whether `hour` is within one level of the morning half's own peak,
    /// used by the Placer's `match_score` to reward concept-heavy subjects.
    /// Derived from the configured curve rather than a fixed clock window,
    /// so a custom curve with a different morning shape still scores right.
    pub fn is_morning_peak(&self, hour: u32) -> bool {
        hour < 12 && self.curve.energy_at(hour as u8) + 1 >= self.peak_level_over(0..12)
    }

    /// Same as `is_morning_peak`, for the evening half and practice-heavy
    /// subjects.
    pub fn is_evening_peak(&self, hour: u32) -> bool {
        (12..24).contains(&hour) && self.curve.energy_at(hour as u8) + 1 >= self.peak_level_over(12..24)
    }
}

use chrono::Timelike;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn level_at_follows_default_curve_peak() {
        let curve = EnergyCurve::default_curve();
        let model = EnergyModel::new(&curve);
        let at = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(model.level_at(at), 9);
    }

    #[test]
    fn peak_windows_follow_the_configured_curve() {
        let curve = EnergyCurve::default_curve();
        let model = EnergyModel::new(&curve);
        assert!(model.is_morning_peak(9));
        assert!(!model.is_morning_peak(13));
        assert!(model.is_evening_peak(16));
        assert!(!model.is_evening_peak(9));
    }
}

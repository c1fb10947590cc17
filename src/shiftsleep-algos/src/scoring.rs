use shiftsleep_types::{SleepStageInterval, StageDurations};

use crate::helpers::time_math::seconds;

pub struct SleepScorer;

impl SleepScorer {
    /// Ideal share of total sleep spent in deep sleep.
    pub const DEEP_SLEEP_WEIGHT: f64 = 0.25;
    /// Ideal share of total sleep spent in eye movement (REM) sleep.
    pub const EYE_MOVEMENT_WEIGHT: f64 = 0.25;
    /// Ideal share of total sleep spent in light sleep.
    pub const LIGHT_SLEEP_WEIGHT: f64 = 0.5;

    pub fn stage_durations(intervals: &[SleepStageInterval]) -> StageDurations {
        let mut durations = StageDurations::default();

        for interval in intervals {
            let duration = seconds(interval.duration());
            debug_assert!(duration >= 0.0, "negative interval duration: {interval:?}");
            durations.add(interval.stage, duration.max(0.0));
        }

        durations
    }

    /// Weighted phase distribution in `[0, 1]`. Zero when there is no sleep.
    pub fn sleep_quality(durations: &StageDurations) -> f64 {
        let total = durations.total_sleep();
        if total <= 0.0 {
            return 0.0;
        }

        (durations.deep_sleep / total) * Self::DEEP_SLEEP_WEIGHT
            + (durations.eye_movement / total) * Self::EYE_MOVEMENT_WEIGHT
            + (durations.light_sleep / total) * Self::LIGHT_SLEEP_WEIGHT
    }

    /// Share of time in bed actually spent asleep.
    pub fn sleep_efficiency(durations: &StageDurations) -> f64 {
        let in_bed = durations.time_in_bed();
        if in_bed <= 0.0 {
            return 0.0;
        }

        durations.total_sleep() / in_bed
    }
}

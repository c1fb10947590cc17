use chrono::{Duration, TimeDelta};
use shiftsleep_types::{SleepStage, SleepStageInterval};

use crate::normalizer::Reading;

/// Longest span a single sleep session may cover, measured from its first interval.
pub const MAX_SESSION_LENGTH: Duration = Duration::hours(12);

/// How a coerced motion value becomes a sleep stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StageMapping {
    /// Values 1 to 4 are the stage itself. Anything else is dropped.
    #[default]
    Direct,
    /// Legacy bucketing of motion magnitude: `<8` awake, `<9` eye movement,
    /// `<10` light sleep, otherwise deep sleep. Disagrees with `Direct` for
    /// every stored stage value and is only kept to compare against old reports.
    MotionMagnitude,
}

impl StageMapping {
    pub fn stage(self, value: f64) -> Option<SleepStage> {
        match self {
            StageMapping::Direct => {
                if value.fract() != 0.0 {
                    return None;
                }
                SleepStage::try_from(value as i64).ok()
            }
            StageMapping::MotionMagnitude => Some(if value < 8.0 {
                SleepStage::Awake
            } else if value < 9.0 {
                SleepStage::EyeMovement
            } else if value < 10.0 {
                SleepStage::LightSleep
            } else {
                SleepStage::DeepSleep
            }),
        }
    }
}

pub struct IntervalBuilder;

impl IntervalBuilder {
    /// Turns motion readings into stage intervals sorted by start time.
    ///
    /// Readings with an unknown stage or a non-positive duration are dropped,
    /// then the result is capped to [`MAX_SESSION_LENGTH`].
    pub fn build(motion: &[Reading], mapping: StageMapping) -> Vec<SleepStageInterval> {
        let mut malformed = 0_usize;
        let mut unknown_stage = 0_usize;

        let mut intervals = motion
            .iter()
            .filter_map(|reading| {
                if reading.end <= reading.start {
                    malformed += 1;
                    return None;
                }
                let Some(stage) = mapping.stage(reading.value) else {
                    unknown_stage += 1;
                    return None;
                };
                Some(SleepStageInterval::new(reading.start, reading.end, stage))
            })
            .collect::<Vec<_>>();

        if malformed + unknown_stage > 0 {
            debug!(
                "dropped {} motion readings ({} malformed, {} unknown stage)",
                malformed + unknown_stage,
                malformed,
                unknown_stage
            );
        }

        intervals.sort_by_key(|i| i.start);
        Self::cap_session(intervals)
    }

    /// Drops intervals starting after `first.start + MAX_SESSION_LENGTH` and
    /// truncates the one crossing that boundary. Expects sorted input.
    pub fn cap_session(intervals: Vec<SleepStageInterval>) -> Vec<SleepStageInterval> {
        if intervals.is_empty() {
            return intervals;
        }

        let limit = intervals[0].start + MAX_SESSION_LENGTH;
        let before = intervals.len();
        let span = Self::span(&intervals);

        let capped = intervals
            .into_iter()
            .filter(|i| i.start < limit)
            .map(|mut i| {
                i.end = i.end.min(limit);
                i
            })
            .collect::<Vec<_>>();

        if capped.len() < before {
            warn!(
                "session spans {}m, capped to {}h: dropped {} intervals after {}",
                span.num_minutes(),
                MAX_SESSION_LENGTH.num_hours(),
                before - capped.len(),
                limit
            );
        }

        capped
    }

    /// Fuses touching intervals of the same stage. Durations are preserved.
    pub fn merge_adjacent(intervals: Vec<SleepStageInterval>) -> Vec<SleepStageInterval> {
        let mut merged: Vec<SleepStageInterval> = Vec::with_capacity(intervals.len());

        for interval in intervals {
            match merged.last_mut() {
                Some(last) if last.stage == interval.stage && last.end == interval.start => {
                    last.end = interval.end;
                }
                _ => merged.push(interval),
            }
        }

        merged
    }

    /// From the first start to the latest end. Expects sorted input.
    pub fn span(intervals: &[SleepStageInterval]) -> TimeDelta {
        match (intervals.first(), intervals.iter().map(|i| i.end).max()) {
            (Some(first), Some(end)) => end - first.start,
            _ => TimeDelta::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
    }

    fn reading(start_min: i64, end_min: i64, value: f64) -> Reading {
        Reading {
            start: base() + Duration::minutes(start_min),
            end: base() + Duration::minutes(end_min),
            value,
        }
    }

    #[test]
    fn direct_mapping() {
        assert_eq!(StageMapping::Direct.stage(1.0), Some(SleepStage::Awake));
        assert_eq!(StageMapping::Direct.stage(4.0), Some(SleepStage::DeepSleep));
        assert_eq!(StageMapping::Direct.stage(0.0), None);
        assert_eq!(StageMapping::Direct.stage(5.0), None);
        assert_eq!(StageMapping::Direct.stage(2.5), None);
    }

    #[test]
    fn magnitude_mapping() {
        let mapping = StageMapping::MotionMagnitude;
        assert_eq!(mapping.stage(3.0), Some(SleepStage::Awake));
        assert_eq!(mapping.stage(8.0), Some(SleepStage::EyeMovement));
        assert_eq!(mapping.stage(9.5), Some(SleepStage::LightSleep));
        assert_eq!(mapping.stage(10.0), Some(SleepStage::DeepSleep));
    }

    #[test]
    fn build_empty() {
        assert!(IntervalBuilder::build(&[], StageMapping::Direct).is_empty());
    }

    #[test]
    fn build_one_interval_per_reading() {
        let motion = [reading(0, 120, 4.0), reading(120, 360, 3.0)];
        let intervals = IntervalBuilder::build(&motion, StageMapping::Direct);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].stage, SleepStage::DeepSleep);
        assert_eq!(intervals[0].duration(), Duration::hours(2));
        assert_eq!(intervals[1].stage, SleepStage::LightSleep);
        assert_eq!(intervals[1].duration(), Duration::hours(4));
    }

    #[test]
    fn build_drops_malformed_and_unknown() {
        let motion = [
            reading(0, 0, 3.0),
            reading(10, 5, 3.0),
            reading(20, 30, 7.0),
            reading(30, 40, 2.0),
        ];
        let intervals = IntervalBuilder::build(&motion, StageMapping::Direct);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].stage, SleepStage::EyeMovement);
    }

    #[test]
    fn build_sorts_by_start() {
        let motion = [reading(60, 90, 3.0), reading(0, 30, 4.0)];
        let intervals = IntervalBuilder::build(&motion, StageMapping::Direct);
        assert_eq!(intervals[0].start, base());
        assert_eq!(intervals[1].start, base() + Duration::minutes(60));
    }

    #[test]
    fn cap_twenty_hour_session() {
        // 20 one-hour readings starting at midnight
        let motion: Vec<Reading> = (0..20)
            .map(|h| reading(h * 60, (h + 1) * 60, 3.0))
            .collect();
        let intervals = IntervalBuilder::build(&motion, StageMapping::Direct);

        assert_eq!(intervals.len(), 12);
        assert_eq!(IntervalBuilder::span(&intervals), Duration::hours(12));
        assert!(intervals.iter().all(|i| i.end <= base() + MAX_SESSION_LENGTH));
    }

    #[test]
    fn cap_truncates_crossing_interval() {
        let motion = [reading(0, 60, 4.0), reading(660, 900, 3.0)];
        let intervals = IntervalBuilder::build(&motion, StageMapping::Direct);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[1].end, base() + Duration::hours(12));
        assert_eq!(intervals[1].duration(), Duration::hours(1));
    }

    #[test]
    fn cap_drops_interval_starting_at_limit() {
        let motion = [reading(0, 60, 4.0), reading(720, 780, 3.0)];
        let intervals = IntervalBuilder::build(&motion, StageMapping::Direct);
        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn merge_adjacent_same_stage() {
        let motion = [
            reading(0, 30, 3.0),
            reading(30, 60, 3.0),
            reading(60, 90, 4.0),
            reading(100, 120, 4.0),
        ];
        let intervals = IntervalBuilder::build(&motion, StageMapping::Direct);
        let merged = IntervalBuilder::merge_adjacent(intervals);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].duration(), Duration::minutes(60));
        assert_eq!(merged[1].stage, SleepStage::DeepSleep);
        assert_eq!(merged[2].start, base() + Duration::minutes(100));
    }
}

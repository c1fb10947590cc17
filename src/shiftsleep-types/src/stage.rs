use chrono::{DateTime, TimeDelta, Utc};

use crate::TypesError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    Awake = 1,
    EyeMovement = 2,
    LightSleep = 3,
    DeepSleep = 4,
}

impl SleepStage {
    pub const ALL: [SleepStage; 4] = [
        SleepStage::Awake,
        SleepStage::EyeMovement,
        SleepStage::LightSleep,
        SleepStage::DeepSleep,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SleepStage::Awake => "awake",
            SleepStage::EyeMovement => "eye movement",
            SleepStage::LightSleep => "light sleep",
            SleepStage::DeepSleep => "deep sleep",
        }
    }

    /// Awake time is tracked but never counts as sleep.
    pub fn is_asleep(self) -> bool {
        !matches!(self, SleepStage::Awake)
    }
}

impl TryFrom<i64> for SleepStage {
    type Error = TypesError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Awake),
            2 => Ok(Self::EyeMovement),
            3 => Ok(Self::LightSleep),
            4 => Ok(Self::DeepSleep),
            _ => Err(TypesError::InvalidStage(value)),
        }
    }
}

impl From<SleepStage> for i64 {
    fn from(stage: SleepStage) -> Self {
        stage as i64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepStageInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stage: SleepStage,
}

impl SleepStageInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, stage: SleepStage) -> Self {
        Self { start, end, stage }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stage_from_direct_values() {
        assert_eq!(SleepStage::try_from(1), Ok(SleepStage::Awake));
        assert_eq!(SleepStage::try_from(2), Ok(SleepStage::EyeMovement));
        assert_eq!(SleepStage::try_from(3), Ok(SleepStage::LightSleep));
        assert_eq!(SleepStage::try_from(4), Ok(SleepStage::DeepSleep));
    }

    #[test]
    fn stage_out_of_range() {
        assert_eq!(SleepStage::try_from(0), Err(TypesError::InvalidStage(0)));
        assert_eq!(SleepStage::try_from(5), Err(TypesError::InvalidStage(5)));
    }

    #[test]
    fn awake_is_not_sleep() {
        assert!(!SleepStage::Awake.is_asleep());
        assert!(SleepStage::DeepSleep.is_asleep());
        assert_eq!(i64::from(SleepStage::LightSleep), 3);
    }

    #[test]
    fn interval_duration() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 15, 2, 0, 0).unwrap();
        let interval = SleepStageInterval::new(start, end, SleepStage::DeepSleep);
        assert_eq!(interval.duration(), TimeDelta::hours(2));
    }

    #[test]
    fn stage_wire_format() {
        let json = serde_json::to_string(&SleepStage::EyeMovement).unwrap();
        assert_eq!(json, r#""eye_movement""#);
    }
}

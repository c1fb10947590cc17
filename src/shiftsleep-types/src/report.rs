use chrono::NaiveDate;

use crate::{ShiftType, SleepStage, SleepStageInterval};

/// Six hours of sleep or more is considered normal.
pub const NORMAL_SLEEP_SECONDS: f64 = 21_600.0;

/// Time spent in every stage, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageDurations {
    pub awake: f64,
    pub eye_movement: f64,
    pub light_sleep: f64,
    pub deep_sleep: f64,
}

impl StageDurations {
    pub fn add(&mut self, stage: SleepStage, seconds: f64) {
        match stage {
            SleepStage::Awake => self.awake += seconds,
            SleepStage::EyeMovement => self.eye_movement += seconds,
            SleepStage::LightSleep => self.light_sleep += seconds,
            SleepStage::DeepSleep => self.deep_sleep += seconds,
        }
    }

    pub fn get(&self, stage: SleepStage) -> f64 {
        match stage {
            SleepStage::Awake => self.awake,
            SleepStage::EyeMovement => self.eye_movement,
            SleepStage::LightSleep => self.light_sleep,
            SleepStage::DeepSleep => self.deep_sleep,
        }
    }

    /// Light + deep + eye movement. Awake time is excluded.
    pub fn total_sleep(&self) -> f64 {
        self.light_sleep + self.deep_sleep + self.eye_movement
    }

    pub fn time_in_bed(&self) -> f64 {
        self.total_sleep() + self.awake
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStatus {
    Normal,
    Abnormal,
    NoData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SleepReport {
    pub device_id: String,
    pub date: NaiveDate,
    pub shift: Option<ShiftType>,
    pub intervals: Vec<SleepStageInterval>,
    pub stage_durations: StageDurations,
    /// Seconds, awake time excluded.
    pub total_sleep_time: f64,
    /// Seconds, awake time included.
    pub time_in_bed: f64,
    /// Fraction in `[0, 1]`, unrounded.
    pub sleep_quality: f64,
    /// Fraction in `[0, 1]`, unrounded.
    pub sleep_efficiency: f64,
    pub heart_rate: VitalStats,
    pub blood_oxygen: VitalStats,
}

/// Sleep statistics across every device of a fleet for one date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub devices: usize,
    pub normal: usize,
    pub abnormal: usize,
    pub no_data: usize,
    /// Seconds, averaged over devices with data.
    pub average_sleep_time: f64,
    pub average_quality: f64,
    /// Shortest total sleep among abnormal devices, in seconds.
    pub shortest_abnormal_sleep: Option<f64>,
}

impl FleetSummary {
    pub fn from_reports(reports: &[SleepReport]) -> Self {
        let mut summary = FleetSummary {
            devices: reports.len(),
            ..Default::default()
        };

        let mut sleep_time = 0.0;
        let mut quality = 0.0;

        for report in reports {
            match report.status() {
                SleepStatus::Normal => summary.normal += 1,
                SleepStatus::Abnormal => {
                    summary.abnormal += 1;
                    summary.shortest_abnormal_sleep = Some(
                        summary
                            .shortest_abnormal_sleep
                            .map_or(report.total_sleep_time, |s| s.min(report.total_sleep_time)),
                    );
                }
                SleepStatus::NoData => {
                    summary.no_data += 1;
                    continue;
                }
            }

            sleep_time += report.total_sleep_time;
            quality += report.sleep_quality;
        }

        let with_data = summary.normal + summary.abnormal;
        if with_data > 0 {
            summary.average_sleep_time = sleep_time / with_data as f64;
            summary.average_quality = quality / with_data as f64;
        }

        summary
    }
}

/// Averages of one device over a range of report dates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceHistorySummary {
    pub device_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_records: usize,
    /// Seconds, averaged over every record in range.
    pub average_sleep_time: f64,
    pub average_quality: f64,
}

impl SleepReport {
    /// Key used when the report is upserted, e.g. `watch-01_20250115`.
    pub fn record_id(&self) -> String {
        format!("{}_{}", self.device_id, self.date.format("%Y%m%d"))
    }

    pub fn status(&self) -> SleepStatus {
        if self.total_sleep_time <= 0.0 {
            SleepStatus::NoData
        } else if self.total_sleep_time >= NORMAL_SLEEP_SECONDS {
            SleepStatus::Normal
        } else {
            SleepStatus::Abnormal
        }
    }

    /// Quality as a percentage rounded to two decimals.
    pub fn quality_percent(&self) -> f64 {
        (self.sleep_quality * 10_000.0).round() / 100.0
    }
}

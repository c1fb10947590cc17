#[macro_use]
extern crate serde;

mod error;
pub use error::TypesError;

mod sample;
pub use sample::{MetricType, RawSample, SampleValue};

mod stage;
pub use stage::{SleepStage, SleepStageInterval};

mod shift;
pub use shift::{ShiftType, ShiftWindow};

mod report;
pub use report::{
    DeviceHistorySummary, FleetSummary, NORMAL_SLEEP_SECONDS, SleepReport, SleepStatus,
    StageDurations, VitalStats,
};

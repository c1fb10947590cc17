#[macro_use]
extern crate log;

pub(crate) mod normalizer;
pub use normalizer::{NormalizeStats, NormalizedSamples, Reading, SampleNormalizer};

pub(crate) mod intervals;
pub use intervals::{IntervalBuilder, MAX_SESSION_LENGTH, StageMapping};

pub(crate) mod shift_window;
pub use shift_window::ShiftWindowFilter;

pub(crate) mod scoring;
pub use scoring::SleepScorer;

pub(crate) mod vitals;
pub use vitals::VitalsCalculator;

pub(crate) mod report;
pub use report::{
    EmptyIntervals, ReportOptions, VitalsWindow, compute_sleep_report, compute_sleep_report_with,
};

pub(crate) mod fleet;
pub use fleet::{
    DEFAULT_HISTORY_DAYS, compute_fleet_reports, group_by_device, history_range,
    summarize_device_history,
};

pub mod helpers;

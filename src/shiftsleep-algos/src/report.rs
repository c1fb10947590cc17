use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use shiftsleep_types::{RawSample, ShiftType, SleepReport};

use crate::{
    intervals::{IntervalBuilder, StageMapping},
    normalizer::SampleNormalizer,
    scoring::SleepScorer,
    shift_window::ShiftWindowFilter,
    vitals::VitalsCalculator,
};

/// What to do with a device whose intervals were all filtered away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyIntervals {
    /// Keep a report with zero durations, so every device still has one.
    #[default]
    Retain,
    Drop,
}

/// Whether heart rate and blood oxygen follow the shift window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VitalsWindow {
    #[default]
    Shift,
    Unfiltered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    pub stage_mapping: StageMapping,
    pub merge_adjacent: bool,
    pub empty_intervals: EmptyIntervals,
    pub vitals_window: VitalsWindow,
    /// Offset the shift window wall clock times are read in.
    pub utc_offset: FixedOffset,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            stage_mapping: StageMapping::default(),
            merge_adjacent: false,
            empty_intervals: EmptyIntervals::default(),
            vitals_window: VitalsWindow::default(),
            utc_offset: Utc.fix(),
        }
    }
}

impl ReportOptions {
    pub fn with_stage_mapping(mut self, stage_mapping: StageMapping) -> Self {
        self.stage_mapping = stage_mapping;
        self
    }

    pub fn with_merge_adjacent(mut self, merge_adjacent: bool) -> Self {
        self.merge_adjacent = merge_adjacent;
        self
    }

    pub fn with_empty_intervals(mut self, empty_intervals: EmptyIntervals) -> Self {
        self.empty_intervals = empty_intervals;
        self
    }

    pub fn with_vitals_window(mut self, vitals_window: VitalsWindow) -> Self {
        self.vitals_window = vitals_window;
        self
    }

    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }
}

/// Sleep report for the device of the first sample, using default options.
///
/// Never fails: bad samples are dropped and missing data yields a zeroed report.
pub fn compute_sleep_report(
    samples: &[RawSample],
    reference_date: NaiveDate,
    shift: Option<ShiftType>,
) -> SleepReport {
    assemble(samples, reference_date, shift, &ReportOptions::default())
}

/// Like [`compute_sleep_report`]. Returns `None` only with
/// [`EmptyIntervals::Drop`] when no sleep interval is left.
pub fn compute_sleep_report_with(
    samples: &[RawSample],
    reference_date: NaiveDate,
    shift: Option<ShiftType>,
    options: &ReportOptions,
) -> Option<SleepReport> {
    let report = assemble(samples, reference_date, shift, options);

    if report.intervals.is_empty() && options.empty_intervals == EmptyIntervals::Drop {
        debug!(
            "{}: no intervals left for {}, dropping report",
            report.device_id, reference_date
        );
        return None;
    }

    Some(report)
}

fn assemble(
    samples: &[RawSample],
    reference_date: NaiveDate,
    shift: Option<ShiftType>,
    options: &ReportOptions,
) -> SleepReport {
    let device_id = samples
        .first()
        .map(|s| s.device_id.clone())
        .unwrap_or_default();

    let normalized = SampleNormalizer::normalize(&device_id, samples);

    let mut intervals = IntervalBuilder::build(&normalized.motion, options.stage_mapping);
    if options.merge_adjacent {
        intervals = IntervalBuilder::merge_adjacent(intervals);
    }

    let window = ShiftWindowFilter::window(shift, reference_date, options.utc_offset);
    let intervals = ShiftWindowFilter::filter_intervals(intervals, window.as_ref());

    let vitals_window = match options.vitals_window {
        VitalsWindow::Shift => window.as_ref(),
        VitalsWindow::Unfiltered => None,
    };
    let heart_rate = ShiftWindowFilter::filter_readings(&normalized.heart_rate, vitals_window);
    let blood_oxygen = ShiftWindowFilter::filter_readings(&normalized.blood_oxygen, vitals_window);

    let stage_durations = SleepScorer::stage_durations(&intervals);

    SleepReport {
        device_id,
        date: reference_date,
        shift,
        total_sleep_time: stage_durations.total_sleep(),
        time_in_bed: stage_durations.time_in_bed(),
        sleep_quality: SleepScorer::sleep_quality(&stage_durations),
        sleep_efficiency: SleepScorer::sleep_efficiency(&stage_durations),
        heart_rate: VitalsCalculator::calculate(&heart_rate),
        blood_oxygen: VitalsCalculator::calculate(&blood_oxygen),
        stage_durations,
        intervals,
    }
}

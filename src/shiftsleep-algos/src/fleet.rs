use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use shiftsleep_types::{DeviceHistorySummary, RawSample, ShiftType, SleepReport};

use crate::{
    helpers::time_math::mean,
    report::{ReportOptions, compute_sleep_report_with},
};

/// Splits a mixed sample list per device, ordered by device id.
pub fn group_by_device(samples: &[RawSample]) -> BTreeMap<String, Vec<RawSample>> {
    let mut devices: BTreeMap<String, Vec<RawSample>> = BTreeMap::new();
    for sample in samples {
        devices
            .entry(sample.device_id.clone())
            .or_default()
            .push(sample.clone());
    }
    devices
}

/// One report per device. `shift_of` supplies each device's shift for the date.
pub fn compute_fleet_reports<F>(
    samples: &[RawSample],
    reference_date: NaiveDate,
    shift_of: F,
    options: &ReportOptions,
) -> Vec<SleepReport>
where
    F: Fn(&str) -> Option<ShiftType>,
{
    group_by_device(samples)
        .into_iter()
        .filter_map(|(device_id, samples)| {
            compute_sleep_report_with(&samples, reference_date, shift_of(&device_id), options)
        })
        .collect()
}

/// Days covered by a device history ending on `end` when no start is given.
pub const DEFAULT_HISTORY_DAYS: u64 = 3;

/// `end` and the date `days` before it, both inclusive.
pub fn history_range(end: NaiveDate, days: u64) -> (NaiveDate, NaiveDate) {
    let start = end.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
    (start, end)
}

/// Averages quality and total sleep of one device over the reports dated
/// within `[start, end]`. Records without sleep still count.
pub fn summarize_device_history(
    reports: &[SleepReport],
    device_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> DeviceHistorySummary {
    let (sleep_times, qualities): (Vec<f64>, Vec<f64>) = reports
        .iter()
        .filter(|r| r.device_id == device_id && r.date >= start && r.date <= end)
        .map(|r| (r.total_sleep_time, r.sleep_quality))
        .unzip();

    DeviceHistorySummary {
        device_id: device_id.to_owned(),
        start,
        end,
        total_records: sleep_times.len(),
        average_sleep_time: mean(&sleep_times),
        average_quality: mean(&qualities),
    }
}

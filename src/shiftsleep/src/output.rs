use std::fmt;

use chrono::FixedOffset;
use shiftsleep_algos::helpers::time_math::round_float;
use shiftsleep_types::{DeviceHistorySummary, FleetSummary, SleepReport, SleepStage, VitalStats};

use crate::helpers::format_hm::{FormatHM, format_local};

/// Text form of a report, interval times shown in `offset`.
pub struct ReportText<'a> {
    pub report: &'a SleepReport,
    pub offset: FixedOffset,
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let shift = report
            .shift
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_owned());

        writeln!(f, "Device: {} ({})", report.device_id, report.record_id())?;
        writeln!(f, "Date: {}, shift: {}", report.date, shift)?;
        writeln!(
            f,
            "Sleep: {} ({:?}), in bed: {}",
            report.total_sleep_time.format_hm(),
            report.status(),
            report.time_in_bed.format_hm()
        )?;
        writeln!(
            f,
            "Quality: {}%, efficiency: {}%",
            report.quality_percent(),
            round_float(report.sleep_efficiency * 100.0)
        )?;

        for stage in SleepStage::ALL {
            writeln!(
                f,
                "\t{}: {}",
                stage.label(),
                report.stage_durations.get(stage).format_hm()
            )?;
        }

        writeln!(f, "Heart rate: {}", Vitals(&report.heart_rate, "bpm"))?;
        writeln!(f, "Blood oxygen: {}", Vitals(&report.blood_oxygen, "%"))?;

        if !report.intervals.is_empty() {
            writeln!(f, "Log:")?;
        }
        for interval in &report.intervals {
            writeln!(
                f,
                "\t{} - {}  {} ({})",
                format_local(interval.start, self.offset),
                format_local(interval.end, self.offset),
                interval.stage.label(),
                interval.duration().format_hm()
            )?;
        }

        Ok(())
    }
}

struct Vitals<'a>(&'a VitalStats, &'a str);

impl fmt::Display for Vitals<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Vitals(stats, unit) = self;
        write!(
            f,
            "min {} {unit}, max {} {unit}, avg {} {unit}",
            stats.min, stats.max, stats.avg
        )
    }
}

pub struct SummaryText<'a>(pub &'a FleetSummary);

impl fmt::Display for SummaryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(
            f,
            "Devices: {}, normal: {}, abnormal: {}, no data: {}",
            summary.devices, summary.normal, summary.abnormal, summary.no_data
        )?;
        writeln!(
            f,
            "Average sleep: {}, average quality: {}%",
            summary.average_sleep_time.format_hm(),
            round_float(summary.average_quality * 100.0)
        )?;
        if let Some(shortest) = summary.shortest_abnormal_sleep {
            writeln!(f, "Shortest abnormal sleep: {}", shortest.format_hm())?;
        }
        Ok(())
    }
}

pub struct HistoryText<'a>(pub &'a DeviceHistorySummary);

impl fmt::Display for HistoryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history = self.0;
        writeln!(
            f,
            "Device: {}, {} to {}, records: {}",
            history.device_id, history.start, history.end, history.total_records
        )?;
        writeln!(
            f,
            "Average sleep: {}, average quality: {}%",
            history.average_sleep_time.format_hm(),
            round_float(history.average_quality * 100.0)
        )
    }
}

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use shiftsleep_types::{ShiftType, ShiftWindow, SleepStageInterval};

use crate::normalizer::Reading;

pub struct ShiftWindowFilter;

impl ShiftWindowFilter {
    /// Sleep window expected for `shift` on `reference_date`, with wall clock
    /// times read in `offset`.
    ///
    /// - day shift: previous day 17:00 until 05:30
    /// - night shift: 05:00 until 17:30
    ///
    /// Every other shift, and no shift at all, has no window.
    pub fn window(
        shift: Option<ShiftType>,
        reference_date: NaiveDate,
        offset: FixedOffset,
    ) -> Option<ShiftWindow> {
        let (start, end) = match shift? {
            ShiftType::Day => (
                Self::local(reference_date.pred_opt()?, 17, 0, offset)?,
                Self::local(reference_date, 5, 30, offset)?,
            ),
            ShiftType::Night => (
                Self::local(reference_date, 5, 0, offset)?,
                Self::local(reference_date, 17, 30, offset)?,
            ),
            ShiftType::FullDay | ShiftType::Off | ShiftType::Other => return None,
        };

        Some(ShiftWindow::new(start, end))
    }

    fn local(
        date: NaiveDate,
        hour: u32,
        minute: u32,
        offset: FixedOffset,
    ) -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Keeps intervals overlapping the window, clipped to its edges.
    /// Without a window the input is returned untouched.
    pub fn filter_intervals(
        intervals: Vec<SleepStageInterval>,
        window: Option<&ShiftWindow>,
    ) -> Vec<SleepStageInterval> {
        let Some(window) = window else {
            return intervals;
        };

        let before = intervals.len();
        let filtered = intervals
            .into_iter()
            .filter_map(|i| {
                let (start, end) = window.clip(i.start, i.end)?;
                Some(SleepStageInterval::new(start, end, i.stage))
            })
            .collect::<Vec<_>>();

        trace!(
            "shift window {} - {} kept {} of {} intervals",
            window.start,
            window.end,
            filtered.len(),
            before
        );

        filtered
    }

    /// Keeps point readings whose timestamp (end time) lies inside the window.
    pub fn filter_readings(readings: &[Reading], window: Option<&ShiftWindow>) -> Vec<Reading> {
        match window {
            Some(window) => readings
                .iter()
                .filter(|r| window.contains(r.end))
                .copied()
                .collect(),
            None => readings.to_vec(),
        }
    }
}

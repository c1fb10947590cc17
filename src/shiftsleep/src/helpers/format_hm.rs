use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

pub trait FormatHM {
    fn format_hm(&self) -> String;
}

impl FormatHM for TimeDelta {
    fn format_hm(&self) -> String {
        let total = self.num_seconds() as f64;
        total.format_hm()
    }
}

/// Seconds, rendered as `7h 05m`.
impl FormatHM for f64 {
    fn format_hm(&self) -> String {
        let minutes = (self / 60.0).round().max(0.0) as i64;
        let h = minutes / 60;
        let m = minutes % 60;
        format!("{}h {:02}m", h, m)
    }
}

pub fn format_local(time: DateTime<Utc>, offset: FixedOffset) -> String {
    time.with_timezone(&offset).format("%d/%m/%Y %H:%M:%S").to_string()
}

use std::{convert::Infallible, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};

/// Work schedule of the wearer on a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    /// Morning worker, sleeps in the evening and night before.
    Day,
    /// Night worker, sleeps during the day.
    Night,
    FullDay,
    Off,
    #[serde(other)]
    Other,
}

impl ShiftType {
    /// Only day and night shifts restrict the sleep window.
    pub fn has_window(self) -> bool {
        matches!(self, ShiftType::Day | ShiftType::Night)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
            ShiftType::FullDay => "fullday",
            ShiftType::Off => "off",
            ShiftType::Other => "other",
        }
    }
}

impl From<&str> for ShiftType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Self::Day,
            "night" => Self::Night,
            "fullday" => Self::FullDay,
            "off" => Self::Off,
            _ => Self::Other,
        }
    }
}

impl FromStr for ShiftType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ShiftWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time <= self.end
    }

    /// Any overlap counts, touching edges do not.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }

    /// Clips `[start, end]` to the window. `None` when they do not overlap.
    pub fn clip(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.overlaps(start, end)
            .then(|| (start.max(self.start), end.min(self.end)))
    }
}

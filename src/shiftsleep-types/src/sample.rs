use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    #[serde(rename = "sleep_motion", alias = "motion")]
    Motion,
    #[serde(rename = "heart_rate")]
    HeartRate,
    #[serde(rename = "blood_oxygen")]
    BloodOxygen,
    #[serde(other)]
    Other,
}

/// Raw value as stored by the device data source. Values arrive either as
/// numbers or as numeric strings, so they stay untyped until [`SampleValue::coerce`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Number(f64),
    Text(String),
}

impl SampleValue {
    /// Coerces the value to a finite number. Text is trimmed before parsing.
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            SampleValue::Number(value) => *value,
            SampleValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };

        value.is_finite().then_some(value)
    }
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for SampleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub device_id: String,
    pub metric_type: MetricType,
    #[serde(default)]
    pub value: Option<SampleValue>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RawSample {
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.as_ref().and_then(SampleValue::coerce)
    }
}

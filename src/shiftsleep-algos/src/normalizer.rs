use chrono::{DateTime, Utc};
use shiftsleep_types::{MetricType, RawSample};

/// A sample whose value survived numeric coercion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub accepted: usize,
    pub unparsable: usize,
    pub foreign_device: usize,
    pub unknown_metric: usize,
}

impl NormalizeStats {
    pub fn dropped(&self) -> usize {
        self.unparsable + self.foreign_device + self.unknown_metric
    }
}

/// Samples of one device split by metric, each sorted by start time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedSamples {
    pub motion: Vec<Reading>,
    pub heart_rate: Vec<Reading>,
    pub blood_oxygen: Vec<Reading>,
    pub stats: NormalizeStats,
}

pub struct SampleNormalizer;

impl SampleNormalizer {
    pub fn normalize(device_id: &str, samples: &[RawSample]) -> NormalizedSamples {
        let mut normalized = NormalizedSamples::default();

        for sample in samples {
            if sample.device_id != device_id {
                normalized.stats.foreign_device += 1;
                continue;
            }

            let bucket = match sample.metric_type {
                MetricType::Motion => &mut normalized.motion,
                MetricType::HeartRate => &mut normalized.heart_rate,
                MetricType::BloodOxygen => &mut normalized.blood_oxygen,
                MetricType::Other => {
                    normalized.stats.unknown_metric += 1;
                    continue;
                }
            };

            let Some(value) = sample.numeric_value() else {
                normalized.stats.unparsable += 1;
                continue;
            };

            bucket.push(Reading {
                start: sample.start_time,
                end: sample.end_time,
                value,
            });
            normalized.stats.accepted += 1;
        }

        normalized.motion.sort_by_key(|r| r.start);
        normalized.heart_rate.sort_by_key(|r| r.start);
        normalized.blood_oxygen.sort_by_key(|r| r.start);

        if normalized.stats.dropped() > 0 {
            debug!(
                "{}: dropped {} samples ({} unparsable, {} foreign device, {} unknown metric)",
                device_id,
                normalized.stats.dropped(),
                normalized.stats.unparsable,
                normalized.stats.foreign_device,
                normalized.stats.unknown_metric,
            );
        }

        normalized
    }
}

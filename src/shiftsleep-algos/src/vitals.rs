use shiftsleep_types::VitalStats;

use crate::{helpers::time_math::mean, normalizer::Reading};

pub struct VitalsCalculator;

impl VitalsCalculator {
    /// Min, max and rounded mean over positive readings. All zero when none are positive.
    pub fn calculate(readings: &[Reading]) -> VitalStats {
        let values = readings
            .iter()
            .map(|r| r.value)
            .filter(|v| *v > 0.0)
            .collect::<Vec<_>>();

        if values.is_empty() {
            return VitalStats::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        VitalStats {
            min,
            max,
            avg: mean(&values).round(),
        }
    }
}

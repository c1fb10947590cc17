use chrono::TimeDelta;

/// Millisecond precise duration in seconds.
pub fn seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn round_float(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_keeps_milliseconds() {
        assert_eq!(seconds(TimeDelta::hours(2)), 7200.0);
        assert_eq!(seconds(TimeDelta::milliseconds(1500)), 1.5);
        assert_eq!(seconds(TimeDelta::zero()), 0.0);
    }

    #[test]
    fn mean_without_readings() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_heart_rates() {
        assert_eq!(mean(&[58.0, 61.0, 64.0]), 61.0);
        assert_eq!(mean(&[96.0, 97.0]), 96.5);
    }

    #[test]
    fn round_float_quality_percent() {
        assert_eq!(round_float(41.666_666), 41.67);
        assert_eq!(round_float(99.995), 100.0);
        assert_eq!(round_float(0.0), 0.0);
    }
}

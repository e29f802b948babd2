//! Descriptive statistics over title durations.
//!
//! All helpers use the population form (divisor N) and treat an empty sample
//! as having zero spread, so callers never have to guard against division by
//! zero.

use num_traits::ToPrimitive;

fn to_f64_values<T: ToPrimitive>(values: &[T]) -> Vec<f64> {
    values.iter().filter_map(|v| v.to_f64()).collect()
}

/// Arithmetic mean, `0.0` for an empty sample.
pub fn mean<T: ToPrimitive>(values: &[T]) -> f64 {
    let values = to_f64_values(values);
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance: mean of squared deviations from the mean.
pub fn variance<T: ToPrimitive>(values: &[T]) -> f64 {
    let values = to_f64_values(values);
    if values.is_empty() {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev<T: ToPrimitive>(values: &[T]) -> f64 {
    variance(values).sqrt()
}

/// Standard deviation relative to the mean.
///
/// Returns `0.0` when the mean is zero (which includes the empty sample).
pub fn coefficient_of_variation<T: ToPrimitive>(values: &[T]) -> f64 {
    let mean = mean(values);
    if mean == 0.0 {
        return 0.0;
    }
    std_dev(values) / mean
}

/// Median of the sample, `0.0` when empty.
pub fn median<T: ToPrimitive>(values: &[T]) -> f64 {
    let mut values = to_f64_values(values);
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

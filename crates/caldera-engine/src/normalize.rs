//! Min-max column normalization.
//!
//! Churn and complexity live on unrelated scales; each column is rescaled
//! onto [0, 1] over exactly the file set being reported. No cross-run
//! memory, no running statistics.

/// Rescale `values` onto [0, 1] with min-max normalization.
///
/// The degenerate case `max == min` maps every value to 0: a uniform column
/// carries no discriminating signal.
///
/// # Examples
///
/// ```
/// use caldera_engine::normalize::min_max;
///
/// let normalized = min_max(&[2.0, 4.0, 6.0]);
/// assert_eq!(normalized, vec![0.0, 0.5, 1.0]);
///
/// let uniform = min_max(&[3.0, 3.0, 3.0]);
/// assert_eq!(uniform, vec![0.0, 0.0, 0.0]);
/// ```
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);

    if max == min {
        return vec![0.0; values.len()];
    }

    let span = max - min;
    values.iter().map(|v| (v - min) / span).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_uniform_column_spans_zero_to_one() {
        let normalized = min_max(&[1.0, 5.0, 9.0]);
        let min = normalized.iter().copied().fold(f64::MAX, f64::min);
        let max = normalized.iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn uniform_column_normalizes_to_all_zero() {
        assert_eq!(min_max(&[7.0, 7.0, 7.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_value_is_degenerate() {
        assert_eq!(min_max(&[42.0]), vec![0.0]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(min_max(&[]).is_empty());
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let normalized = min_max(&[0.0, 3.0, 11.0, 2.0, 8.0]);
        for v in normalized {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn preserves_relative_order() {
        let normalized = min_max(&[10.0, 30.0, 20.0]);
        assert!(normalized[0] < normalized[2]);
        assert!(normalized[2] < normalized[1]);
    }
}

/// Values of a dataset at a fixed set of percentile points.
///
/// # Examples
///
/// ```
/// use mabs_stats::percentiles::Percentiles;
///
/// let dice = [0.71, 0.84, 0.79, 0.88, 0.62];
/// let percentiles = Percentiles::new(&dice, &[5.0, 50.0, 95.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(0.79));
/// assert_eq!(percentiles.as_slice().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    /// `(percentile, value)` pairs in request order, percentiles in `0.0..=100.0`.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Evaluates `percentile_points` on values already sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Sorts a copy of `values` and evaluates `percentile_points` on it.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Value at `percentile`, or `None` if it was not one of the requested points.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// All `(percentile, value)` pairs.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the closest ranks: for `n` values the
/// fractional rank of the k-th percentile is `k / 100 * (n - 1)`, and the result
/// interpolates between the values at the floor and ceiling of that rank.
/// Percentiles outside `0.0..=100.0` are clamped to the extremes.
///
/// Returns `f64::NAN` for an empty input.
///
/// # Examples
///
/// ```
/// use mabs_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert!((compute_percentile(&values, 95.0) - 4.8).abs() < 1e-12);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let rank = (percentile / 100.0 * last as f64).clamp(0.0, last as f64);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - rank.floor();
    let low_value = sorted_values[lower];
    low_value + (sorted_values[upper] - low_value) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_is_nan() {
        assert!(compute_percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_requested_point_lookup() {
        let percentiles = Percentiles::new(&[1.0, 2.0, 3.0, 4.0, 5.0], &[50.0, 100.0]);
        assert_eq!(percentiles.get(100.0), Some(5.0));
        assert_eq!(percentiles.get(25.0), None);
    }

    #[test]
    fn test_single_value() {
        let values = [0.82];
        for p in [0.0, 5.0, 50.0, 95.0, 100.0] {
            assert_eq!(compute_percentile(&values, p), 0.82);
        }
    }

    #[test]
    fn test_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(approx_eq(compute_percentile(&values, 5.0), 1.2));
        assert!(approx_eq(compute_percentile(&values, 50.0), 3.0));
        assert!(approx_eq(compute_percentile(&values, 95.0), 4.8));
    }

    #[test]
    fn test_even_count_median_is_midpoint() {
        let values = [1.0, 2.0, 3.0, 10.0];
        assert!(approx_eq(compute_percentile(&values, 50.0), 2.5));
    }

    #[test]
    fn test_out_of_range_percentile_is_clamped() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(compute_percentile(&values, -10.0), 1.0);
        assert_eq!(compute_percentile(&values, 150.0), 3.0);
    }

    #[test]
    fn test_new_sorts_input() {
        let percentiles = Percentiles::new(&[9.0, 1.0, 5.0], &[0.0, 50.0, 100.0]);
        assert_eq!(
            percentiles.as_slice(),
            &[(0.0, 1.0), (50.0, 5.0), (100.0, 9.0)]
        );
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = Percentiles::from_sorted(&[3.0, 1.0], &[50.0]);
    }
}

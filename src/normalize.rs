//! Cohort normalization primitives. Both are total functions: degenerate
//! cohorts produce the documented defaults instead of erroring.

/// Z-score of `value` against the cohort sample. Needs at least three
/// samples and a non-degenerate spread; otherwise 0.0.
pub fn zscore(values: &[f64], value: f64) -> f64 {
    let samples: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if samples.len() < 3 {
        return 0.0;
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance = samples
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (samples.len() - 1) as f64;
    let stdev = variance.sqrt();

    if stdev < 1e-6 {
        return 0.0;
    }
    (value - mean) / stdev
}

/// Min-max position of `value` within the cohort sample. Needs at least two
/// samples; a near-constant cohort maps every member to 0.5.
pub fn minmax(values: &[f64], value: f64) -> f64 {
    let samples: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if samples.len() < 2 {
        return 0.0;
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max - min < 1e-6 {
        return 0.5;
    }
    (value - min) / (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zscore_needs_three_samples() {
        assert_eq!(zscore(&[], 5.0), 0.0);
        assert_eq!(zscore(&[1.0], 5.0), 0.0);
        assert_eq!(zscore(&[1.0, 2.0], 5.0), 0.0);
    }

    #[test]
    fn zscore_of_constant_cohort_is_zero() {
        assert_eq!(zscore(&[4.0, 4.0, 4.0], 4.0), 0.0);
    }

    #[test]
    fn zscore_matches_sample_stdev() {
        // mean 50, sample stdev 50
        let cohort = [0.0, 50.0, 100.0];
        assert!((zscore(&cohort, 100.0) - 1.0).abs() < 1e-9);
        assert!((zscore(&cohort, 0.0) + 1.0).abs() < 1e-9);
        assert_eq!(zscore(&cohort, 50.0), 0.0);
    }

    #[test]
    fn zscore_ignores_non_finite_samples() {
        assert_eq!(zscore(&[f64::NAN, 1.0, 2.0], 2.0), 0.0);
    }

    #[test]
    fn minmax_needs_two_samples() {
        assert_eq!(minmax(&[], 5.0), 0.0);
        assert_eq!(minmax(&[3.0], 5.0), 0.0);
    }

    #[test]
    fn minmax_of_constant_cohort_is_half() {
        assert_eq!(minmax(&[7.0, 7.0, 7.0], 7.0), 0.5);
    }

    #[test]
    fn minmax_spans_unit_interval() {
        let cohort = [100.0, 300.0, 500.0];
        assert_eq!(minmax(&cohort, 100.0), 0.0);
        assert_eq!(minmax(&cohort, 300.0), 0.5);
        assert_eq!(minmax(&cohort, 500.0), 1.0);
    }
}

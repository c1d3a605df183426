//! Raw scoring, Bayesian shrinkage, and temporal smoothing.

use crate::config::RankingConfig;
use crate::models::{Confidence, SignalBundle};
use crate::normalize::{minmax, zscore};

/// Normalized signal values for one entity within its cohort.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedSignals {
    pub demand_z: f64,
    pub salary_z: f64,
    pub fee_n: f64,
    pub hours_n: f64,
}

/// The cohort reference sample per signal: every extracted value in the
/// domain, missing-data defaults included. Degenerate samples are handled
/// by the normalizers themselves.
#[derive(Debug, Clone, Default)]
pub struct CohortSamples {
    pub demand: Vec<f64>,
    pub salary: Vec<f64>,
    pub fee: Vec<f64>,
    pub hours: Vec<f64>,
}

impl CohortSamples {
    pub fn collect(bundles: &[SignalBundle]) -> Self {
        let mut samples = Self::default();
        for b in bundles {
            samples.demand.push(b.demand);
            samples.salary.push(b.salary);
            samples.fee.push(b.fee);
            samples.hours.push(b.hours);
        }
        samples
    }

    pub fn normalize(&self, bundle: &SignalBundle) -> NormalizedSignals {
        NormalizedSignals {
            demand_z: zscore(&self.demand, bundle.demand),
            salary_z: zscore(&self.salary, bundle.salary),
            fee_n: minmax(&self.fee, bundle.fee),
            hours_n: minmax(&self.hours, bundle.hours),
        }
    }
}

/// Entities with no recorded fee take the cheapest observed fee in their
/// cohort before normalization.
pub fn apply_fee_floor(bundles: &mut [SignalBundle]) {
    let floor = bundles
        .iter()
        .map(|b| b.fee)
        .filter(|f| *f > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !floor.is_finite() {
        return;
    }
    for b in bundles {
        if b.fee <= 0.0 {
            b.fee = floor;
        }
    }
}

/// Weighted raw score. Fee and hours are inverted (lower friction is
/// better); difficulty is an additive bonus outside the weighted budget.
pub fn raw_score(cfg: &RankingConfig, bundle: &SignalBundle, norm: &NormalizedSignals) -> f64 {
    let w = &cfg.weights;
    w.demand * norm.demand_z
        + w.salary * norm.salary_z
        + w.fee * (1.0 - norm.fee_n)
        + w.hours * (1.0 - norm.hours_n)
        + w.freshness * bundle.freshness
        + bundle.difficulty
}

/// Shrinkage factor: entities with fewer observed signals regress harder
/// toward the cohort mean, capped at 0.6.
pub fn shrinkage_lambda(observations: u32) -> f64 {
    (1.0 - observations as f64 / 2.0).clamp(0.0, 0.6)
}

pub fn shrink(raw: f64, cohort_mean: f64, observations: u32) -> f64 {
    let lam = shrinkage_lambda(observations);
    lam * cohort_mean + (1.0 - lam) * raw
}

/// EMA blend with the previous run's smoothed score. A slug with no prior
/// history passes its first observation through unchanged.
pub fn smooth(shrunk: f64, previous: Option<f64>, alpha: f64) -> f64 {
    let prev = previous.unwrap_or(shrunk);
    alpha * shrunk + (1.0 - alpha) * prev
}

pub fn confidence(observations: u32) -> Confidence {
    match observations {
        0 => Confidence::Low,
        1 => Confidence::Medium,
        _ => Confidence::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand_only(demand: f64) -> SignalBundle {
        SignalBundle {
            demand,
            salary: 0.0,
            fee: 200.0,
            hours: 40.0,
            difficulty: 0.10,
            freshness: 1.0,
        }
    }

    #[test]
    fn lambda_stays_in_bounds() {
        assert_eq!(shrinkage_lambda(0), 0.6);
        assert_eq!(shrinkage_lambda(1), 0.5);
        assert_eq!(shrinkage_lambda(2), 0.0);
        for obs in 0..=2 {
            let lam = shrinkage_lambda(obs);
            assert!((0.0..=0.6).contains(&lam));
        }
    }

    #[test]
    fn full_observations_bypass_shrinkage() {
        assert_eq!(shrink(2.0, 0.5, 2), 2.0);
    }

    #[test]
    fn zero_observations_pull_toward_cohort_mean() {
        let shrunk = shrink(2.0, 0.5, 0);
        let expected = 0.6 * 0.5 + 0.4 * 2.0;
        assert!((shrunk - expected).abs() < 1e-9);
    }

    #[test]
    fn first_observation_passes_through() {
        assert_eq!(smooth(1.25, None, 0.5), 1.25);
    }

    #[test]
    fn ema_converges_monotonically_to_constant_input() {
        let target = 1.0;
        let mut smoothed = smooth(target, Some(0.0), 0.5);
        let mut last_gap = (target - smoothed).abs();
        for _ in 0..10 {
            smoothed = smooth(target, Some(smoothed), 0.5);
            let gap = (target - smoothed).abs();
            assert!(gap < last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-3);
    }

    #[test]
    fn smoothed_is_convex_combination() {
        let smoothed = smooth(2.0, Some(1.0), 0.5);
        assert!((1.0..=2.0).contains(&smoothed));
        assert_eq!(smoothed, 1.5);
    }

    #[test]
    fn confidence_tracks_observation_count() {
        assert_eq!(confidence(0), Confidence::Low);
        assert_eq!(confidence(1), Confidence::Medium);
        assert_eq!(confidence(2), Confidence::High);
    }

    #[test]
    fn fee_floor_fills_missing_fees_only() {
        let mut bundles = vec![demand_only(10.0), demand_only(20.0), demand_only(30.0)];
        bundles[1].fee = 0.0;
        bundles[2].fee = 450.0;
        apply_fee_floor(&mut bundles);
        assert_eq!(bundles[0].fee, 200.0);
        assert_eq!(bundles[1].fee, 200.0);
        assert_eq!(bundles[2].fee, 450.0);
    }

    #[test]
    fn fee_floor_leaves_feeless_cohort_alone() {
        let mut bundles = vec![demand_only(10.0), demand_only(20.0)];
        bundles[0].fee = 0.0;
        bundles[1].fee = 0.0;
        apply_fee_floor(&mut bundles);
        assert_eq!(bundles[0].fee, 0.0);
        assert_eq!(bundles[1].fee, 0.0);
    }

    #[test]
    fn higher_demand_scores_higher_when_rest_is_equal() {
        let cfg = RankingConfig::default();
        let bundles = vec![demand_only(0.0), demand_only(50.0), demand_only(100.0)];
        let samples = CohortSamples::collect(&bundles);

        // mean 50, sample stdev 50
        let norms: Vec<NormalizedSignals> =
            bundles.iter().map(|b| samples.normalize(b)).collect();
        assert!((norms[2].demand_z - 1.0).abs() < 1e-9);
        assert!((norms[0].demand_z + 1.0).abs() < 1e-9);

        let scores: Vec<f64> = bundles
            .iter()
            .zip(&norms)
            .map(|(b, n)| raw_score(&cfg, b, n))
            .collect();
        assert!(scores[2] > scores[1]);
        assert!(scores[1] > scores[0]);
    }
}

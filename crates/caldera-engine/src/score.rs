//! Composite score combination.
//!
//! A hotspot requires BOTH high churn AND high complexity: a complex file
//! nobody touches, or a churned file that is trivial, is not a refactoring
//! priority. The default geometric mean collapses to 0 whenever either
//! factor is 0, enforcing that AND semantics. The policy is pluggable via
//! configuration rather than hard-coded.

use caldera_core::{CombinePolicy, ScoringConfig};

/// Combines normalized churn and complexity into one composite score.
///
/// Deterministic given its two inputs: no randomness, no order dependence.
///
/// # Examples
///
/// ```
/// use caldera_core::ScoringConfig;
/// use caldera_engine::score::Scorer;
///
/// let scorer = Scorer::new(&ScoringConfig::default());
/// assert_eq!(scorer.combine(0.0, 1.0), 0.0);
/// assert_eq!(scorer.combine(1.0, 1.0), 1.0);
/// assert!((scorer.combine(0.5, 0.5) - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    policy: CombinePolicy,
    churn_weight: f64,
}

impl Scorer {
    /// Build a scorer from configuration. The weighted-sum churn weight is
    /// clamped to [0, 1].
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            policy: config.combine,
            churn_weight: config.churn_weight.clamp(0.0, 1.0),
        }
    }

    /// Combine normalized churn and complexity (both in [0, 1]) into a
    /// composite score in [0, 1].
    pub fn combine(&self, churn: f64, complexity: f64) -> f64 {
        match self.policy {
            CombinePolicy::GeometricMean => (churn * complexity).sqrt(),
            CombinePolicy::Product => churn * complexity,
            CombinePolicy::WeightedSum => {
                self.churn_weight * churn + (1.0 - self.churn_weight) * complexity
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer(policy: CombinePolicy) -> Scorer {
        Scorer::new(&ScoringConfig {
            combine: policy,
            churn_weight: 0.5,
        })
    }

    #[test]
    fn geometric_mean_is_zero_when_either_factor_is_zero() {
        let s = scorer(CombinePolicy::GeometricMean);
        assert_eq!(s.combine(0.0, 1.0), 0.0);
        assert_eq!(s.combine(1.0, 0.0), 0.0);
        assert_eq!(s.combine(0.0, 0.0), 0.0);
    }

    #[test]
    fn geometric_mean_is_one_only_when_both_are_one() {
        let s = scorer(CombinePolicy::GeometricMean);
        assert_eq!(s.combine(1.0, 1.0), 1.0);
        assert!(s.combine(1.0, 0.99) < 1.0);
        assert!(s.combine(0.99, 1.0) < 1.0);
    }

    #[test]
    fn geometric_mean_matches_sqrt_of_product() {
        let s = scorer(CombinePolicy::GeometricMean);
        let combined = s.combine(0.4, 0.9);
        assert!((combined - (0.4f64 * 0.9).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn geometric_mean_beats_arithmetic_balance() {
        // A file strong in only one dimension must not outrank a balanced one.
        let s = scorer(CombinePolicy::GeometricMean);
        let lopsided = s.combine(1.0, 0.1);
        let balanced = s.combine(0.5, 0.5);
        assert!(balanced > lopsided);
    }

    #[test]
    fn product_policy_multiplies() {
        let s = scorer(CombinePolicy::Product);
        assert!((s.combine(0.5, 0.5) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn weighted_sum_uses_configured_weight() {
        let s = Scorer::new(&ScoringConfig {
            combine: CombinePolicy::WeightedSum,
            churn_weight: 0.75,
        });
        assert!((s.combine(1.0, 0.0) - 0.75).abs() < 1e-12);
        assert!((s.combine(0.0, 1.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn weight_is_clamped() {
        let s = Scorer::new(&ScoringConfig {
            combine: CombinePolicy::WeightedSum,
            churn_weight: 3.0,
        });
        assert!((s.combine(1.0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn outputs_stay_in_unit_interval() {
        for policy in [
            CombinePolicy::GeometricMean,
            CombinePolicy::Product,
            CombinePolicy::WeightedSum,
        ] {
            let s = scorer(policy);
            for &(c, x) in &[(0.0, 0.0), (0.3, 0.8), (1.0, 1.0), (0.0, 1.0)] {
                let score = s.combine(c, x);
                assert!((0.0..=1.0).contains(&score), "{policy:?} gave {score}");
            }
        }
    }
}

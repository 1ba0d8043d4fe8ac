//! Join, score, and deterministically order the per-file records.
//!
//! The working-tree file set (from the complexity side) drives the join:
//! files with history but no working-tree presence — deleted files kept for
//! churn bookkeeping — drop out here, and files with no recorded history
//! join with churn 0.

use std::cmp::Ordering;
use std::collections::HashMap;

use caldera_complexity::aggregate::ComplexityRecord;
use caldera_history::churn::ChurnRecord;
use serde::{Deserialize, Serialize};

use crate::normalize::min_max;
use crate::score::Scorer;

/// The terminal artifact of a run: one file's raw signals plus its composite
/// score.
///
/// # Examples
///
/// ```
/// use caldera_engine::rank::HotspotRecord;
///
/// let record = HotspotRecord {
///     path: "src/resolver.py".into(),
///     churn: 12,
///     complexity: 45,
///     score: 0.87,
/// };
/// assert!(record.score <= 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotRecord {
    /// Canonical repository-relative path.
    pub path: String,
    /// Raw revision count.
    pub churn: u32,
    /// Raw aggregate complexity.
    pub complexity: u64,
    /// Composite score in [0, 1].
    pub score: f64,
}

/// Join churn and complexity by file key, normalize both columns, combine
/// into composite scores, and sort.
///
/// Sort key: score descending, then churn descending, then complexity
/// descending, then path ascending — a total order, so identical input
/// produces identical output across runs and platforms. The full list is
/// returned; truncation is a display concern.
///
/// # Examples
///
/// ```
/// use caldera_core::ScoringConfig;
/// use caldera_complexity::aggregate::ComplexityRecord;
/// use caldera_history::churn::ChurnRecord;
/// use caldera_engine::rank::build_ranking;
/// use caldera_engine::score::Scorer;
///
/// let churn = vec![ChurnRecord { path: "a.py".into(), revisions: 4, deleted: false }];
/// let complexity = vec![
///     ComplexityRecord { path: "a.py".into(), complexity: 10, units: 2 },
///     ComplexityRecord { path: "b.py".into(), complexity: 3, units: 1 },
/// ];
/// let ranked = build_ranking(&churn, &complexity, &Scorer::new(&ScoringConfig::default()));
/// assert_eq!(ranked[0].path, "a.py");
/// ```
pub fn build_ranking(
    churn: &[ChurnRecord],
    complexity: &[ComplexityRecord],
    scorer: &Scorer,
) -> Vec<HotspotRecord> {
    let churn_by_path: HashMap<&str, u32> = churn
        .iter()
        .map(|r| (r.path.as_str(), r.revisions))
        .collect();

    let mut records: Vec<HotspotRecord> = complexity
        .iter()
        .map(|c| HotspotRecord {
            path: c.path.clone(),
            churn: churn_by_path.get(c.path.as_str()).copied().unwrap_or(0),
            complexity: c.complexity,
            score: 0.0,
        })
        .collect();

    if records.is_empty() {
        return records;
    }

    let churn_column: Vec<f64> = records.iter().map(|r| f64::from(r.churn)).collect();
    let complexity_column: Vec<f64> = records.iter().map(|r| r.complexity as f64).collect();
    let norm_churn = min_max(&churn_column);
    let norm_complexity = min_max(&complexity_column);

    for (i, record) in records.iter_mut().enumerate() {
        record.score = scorer.combine(norm_churn[i], norm_complexity[i]);
    }

    records.sort_by(compare);
    records
}

fn compare(a: &HotspotRecord, b: &HotspotRecord) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.churn.cmp(&a.churn))
        .then_with(|| b.complexity.cmp(&a.complexity))
        .then_with(|| a.path.cmp(&b.path))
}

//! Per-file complexity aggregation.
//!
//! One file, many measured units, one aggregate number. The policy is the
//! sum of unit complexities: total cognitive load, so a file with many
//! simple units and a file with one monster unit stay distinguishable, and
//! file size deliberately collaborates with complexity.

use serde::{Deserialize, Serialize};

use crate::metrics::ComplexityUnit;

/// Aggregate complexity for one file.
///
/// # Examples
///
/// ```
/// use caldera_complexity::aggregate::ComplexityRecord;
///
/// let record = ComplexityRecord {
///     path: "src/parser.py".into(),
///     complexity: 42,
///     units: 7,
/// };
/// assert_eq!(record.units, 7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityRecord {
    /// Repository-relative path.
    pub path: String,
    /// Sum of unit complexities; 0 for files with no measurable units.
    pub complexity: u64,
    /// Number of units measured.
    pub units: usize,
}

/// Aggregate a file's units into one record.
///
/// A pure function of the unit set: no hidden state, no order dependence.
/// Zero units produce complexity 0 — the file stays in the ranking so
/// churn-only hotspots remain visible.
///
/// # Examples
///
/// ```
/// use caldera_complexity::aggregate::aggregate_complexity;
/// use caldera_complexity::metrics::{ComplexityUnit, UnitKind};
///
/// let unit = |c: u32| ComplexityUnit {
///     name: "f".into(),
///     kind: UnitKind::Function,
///     line: 1,
///     complexity: c,
/// };
/// let record = aggregate_complexity("x.py", &[unit(3), unit(5), unit(2)]);
/// assert_eq!(record.complexity, 10);
/// ```
pub fn aggregate_complexity(path: &str, units: &[ComplexityUnit]) -> ComplexityRecord {
    ComplexityRecord {
        path: path.to_string(),
        complexity: units.iter().map(|u| u64::from(u.complexity)).sum(),
        units: units.len(),
    }
}

//! Static complexity measurement and per-file aggregation.
//!
//! Walks the working tree with the `ignore` crate, measures per-unit
//! cyclomatic complexity with tree-sitter, and aggregates each file's units
//! into one number. Measurement is embarrassingly parallel across files and
//! runs on a rayon pool.

pub mod aggregate;
pub mod metrics;
pub mod walker;

use caldera_core::{CalderaError, CancelFlag, Result, Warning};
use rayon::prelude::*;

use aggregate::{aggregate_complexity, ComplexityRecord};
use metrics::ComplexitySource;
use walker::SourceFile;

/// Measure and aggregate complexity for every file, in parallel.
///
/// Each file's result is independent, so files are fanned out over rayon's
/// pool; the returned records are sorted by path so output is deterministic
/// regardless of scheduling. Per-file measurement failures are converted to
/// warnings with complexity 0 — one unparsable file must not block the rest
/// of the tree.
///
/// # Errors
///
/// Returns [`CalderaError::Complexity`] if the backend is unavailable
/// entirely, or [`CalderaError::Cancelled`] if `cancel` fires.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use caldera_core::{CancelFlag, FilesConfig};
/// use caldera_complexity::metrics::TreeSitterSource;
/// use caldera_complexity::{collect_complexity, walker::walk_repo};
///
/// let files = walk_repo(Path::new("."), &FilesConfig::default()).unwrap();
/// let (records, warnings) =
///     collect_complexity(&files, &TreeSitterSource, &CancelFlag::new()).unwrap();
/// println!("{} files, {} warnings", records.len(), warnings.len());
/// ```
pub fn collect_complexity<S: ComplexitySource>(
    files: &[SourceFile],
    source: &S,
    cancel: &CancelFlag,
) -> Result<(Vec<ComplexityRecord>, Vec<Warning>)> {
    source.ensure_available()?;

    let measured: Result<Vec<(ComplexityRecord, Option<Warning>)>> = files
        .par_iter()
        .map(|file| {
            if cancel.is_cancelled() {
                return Err(CalderaError::Cancelled);
            }
            let key = file.key();
            match source.units(file) {
                Ok(units) => Ok((aggregate_complexity(&key, &units), None)),
                Err(e) => Ok((
                    aggregate_complexity(&key, &[]),
                    Some(Warning {
                        path: key,
                        message: format!("complexity measurement failed: {e}"),
                    }),
                )),
            }
        })
        .collect();

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for (record, warning) in measured? {
        records.push(record);
        warnings.extend(warning);
    }

    records.sort_by(|a, b| a.path.cmp(&b.path));
    warnings.sort_by(|a, b| a.path.cmp(&b.path));
    Ok((records, warnings))
}

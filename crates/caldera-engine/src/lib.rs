//! The hotspot scoring engine: churn × complexity ranking.
//!
//! Wires the pipeline together: mine the commit stream, fold it into
//! per-file churn, walk the working tree and measure per-file complexity in
//! parallel, then join, normalize, score, and rank. Each run is a pure batch
//! computation with no state carried between runs.

pub mod normalize;
pub mod plot;
pub mod rank;
pub mod report;
pub mod score;

use std::path::Path;

use caldera_core::{CalderaConfig, CalderaError, CancelFlag, Warning};
use caldera_complexity::metrics::TreeSitterSource;
use caldera_complexity::{collect_complexity, walker};
use caldera_history::churn::extract_churn;
use caldera_history::mining::{CommitSource, GitSource};

use rank::HotspotRecord;
use score::Scorer;

/// The complete result of one analysis run.
///
/// # Examples
///
/// ```
/// use caldera_engine::Analysis;
///
/// let analysis = Analysis {
///     records: Vec::new(),
///     warnings: Vec::new(),
///     commits: 0,
///     files: 0,
/// };
/// assert!(analysis.records.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Ordered hotspot ranking, best candidates first.
    pub records: Vec<HotspotRecord>,
    /// Non-fatal per-file problems encountered along the way.
    pub warnings: Vec<Warning>,
    /// Number of commits consumed from the stream.
    pub commits: usize,
    /// Number of working-tree files ranked.
    pub files: usize,
}

/// Run the full hotspot analysis for the repository at `root`.
///
/// History extraction is sequential (rename chains need commit order);
/// per-file complexity fans out over a rayon pool; normalization and scoring
/// wait for both columns to be complete.
///
/// # Errors
///
/// Returns [`CalderaError::History`] if `root` is not a version-controlled
/// tree, [`CalderaError::Complexity`] if the complexity backend is
/// unavailable, [`CalderaError::PathNotFound`] if `root` does not exist, or
/// [`CalderaError::Cancelled`] if `cancel` fires mid-run. Fatal errors
/// produce no ranking at all.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use caldera_core::{CalderaConfig, CancelFlag};
/// use caldera_engine::analyze;
///
/// let analysis = analyze(
///     Path::new("."),
///     &CalderaConfig::default(),
///     &CancelFlag::new(),
/// )
/// .unwrap();
/// for r in analysis.records.iter().take(5) {
///     println!("{}: {:.2}", r.path, r.score);
/// }
/// ```
pub fn analyze(
    root: &Path,
    config: &CalderaConfig,
    cancel: &CancelFlag,
) -> Result<Analysis, CalderaError> {
    if !root.exists() {
        return Err(CalderaError::PathNotFound(root.to_path_buf()));
    }

    let source = GitSource::new(root, config.history.clone());
    let events = source.events(cancel)?;
    let churn = extract_churn(&events);

    let files = walker::walk_repo(root, &config.files)?;
    let (complexity, warnings) = collect_complexity(&files, &TreeSitterSource, cancel)?;

    let scorer = Scorer::new(&config.scoring);
    let records = rank::build_ranking(&churn, &complexity, &scorer);
    let files_ranked = records.len();

    Ok(Analysis {
        records,
        warnings,
        commits: events.len(),
        files: files_ranked,
    })
}

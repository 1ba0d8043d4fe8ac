//! Commit-stream mining via git2.
//!
//! Walks a repository's history and emits [`CommitEvent`] values describing
//! which paths each commit touched, with rename information preserved. The
//! [`CommitSource`] trait keeps the rest of the pipeline independent of the
//! git2 backend.

use std::path::{Path, PathBuf};

use caldera_core::{CalderaError, CancelFlag, HistoryConfig};
use git2::{Delta, DiffOptions, Repository, Sort};

/// One path touched by a commit.
///
/// `old_path` is absent for additions; `new_path` is absent for deletions;
/// both differ for renames.
///
/// # Examples
///
/// ```
/// use caldera_history::mining::PathTouch;
///
/// let rename = PathTouch {
///     old_path: Some("src/old.rs".into()),
///     new_path: Some("src/new.rs".into()),
/// };
/// assert!(rename.is_rename());
/// assert!(!rename.is_deletion());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTouch {
    /// Path before the commit, if the file existed.
    pub old_path: Option<String>,
    /// Path after the commit, if the file still exists.
    pub new_path: Option<String>,
}

impl PathTouch {
    /// Whether this touch moves a file to a different path.
    pub fn is_rename(&self) -> bool {
        match (&self.old_path, &self.new_path) {
            (Some(old), Some(new)) => old != new,
            _ => false,
        }
    }

    /// Whether this touch removes the file.
    pub fn is_deletion(&self) -> bool {
        self.new_path.is_none()
    }

    /// The path the file has after this commit, falling back to the old
    /// path for deletions.
    pub fn effective_path(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }
}

/// One commit's worth of history: an opaque revision id plus the paths it
/// touched.
///
/// # Examples
///
/// ```
/// use caldera_history::mining::{CommitEvent, PathTouch};
///
/// let event = CommitEvent {
///     id: "abc123".into(),
///     author: "alice".into(),
///     timestamp: 1_700_000_000,
///     summary: "fix: rename resolver".into(),
///     touches: vec![PathTouch {
///         old_path: Some("a.py".into()),
///         new_path: Some("a.py".into()),
///     }],
/// };
/// assert_eq!(event.touches.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CommitEvent {
    /// Short commit hash (or any backend-specific revision id).
    pub id: String,
    /// Author name, used only for progress and warning context.
    pub author: String,
    /// Unix timestamp of the commit.
    pub timestamp: i64,
    /// First line of the commit message.
    pub summary: String,
    /// Paths touched by this commit, in diff order.
    pub touches: Vec<PathTouch>,
}

/// A source of commit events.
///
/// Any version-control backend that can report, per commit, which paths were
/// touched (with rename info) satisfies this contract. The stream is read
/// exactly once per run.
pub trait CommitSource {
    /// Produce the full event stream for the configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`CalderaError::History`] if the stream cannot be obtained at
    /// all, or [`CalderaError::Cancelled`] if `cancel` fires mid-walk.
    fn events(&self, cancel: &CancelFlag) -> Result<Vec<CommitEvent>, CalderaError>;
}

/// git2-backed [`CommitSource`].
///
/// Walks commits newest-first from HEAD (or a configured branch), diffing
/// each commit against its first parent with rename detection enabled.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use caldera_core::{CancelFlag, HistoryConfig};
/// use caldera_history::mining::{CommitSource, GitSource};
///
/// let source = GitSource::new(Path::new("."), HistoryConfig::default());
/// let events = source.events(&CancelFlag::new()).unwrap();
/// for e in &events {
///     println!("{}: {} paths", e.id, e.touches.len());
/// }
/// ```
pub struct GitSource {
    repo_path: PathBuf,
    options: HistoryConfig,
}

impl GitSource {
    /// Create a source for the repository at `repo_path`.
    pub fn new(repo_path: &Path, options: HistoryConfig) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
            options,
        }
    }
}

impl CommitSource for GitSource {
    fn events(&self, cancel: &CancelFlag) -> Result<Vec<CommitEvent>, CalderaError> {
        let repo = Repository::open(&self.repo_path)
            .map_err(|e| CalderaError::History(format!("failed to open repository: {e}")))?;

        let mut revwalk = repo
            .revwalk()
            .map_err(|e| CalderaError::History(format!("failed to create revwalk: {e}")))?;

        revwalk.set_sorting(Sort::TIME).ok();

        if let Some(ref branch) = self.options.branch {
            let reference = repo.resolve_reference_from_short_name(branch).map_err(|e| {
                CalderaError::History(format!("failed to resolve branch '{branch}': {e}"))
            })?;
            let oid = reference
                .target()
                .ok_or_else(|| CalderaError::History("branch has no target".into()))?;
            revwalk
                .push(oid)
                .map_err(|e| CalderaError::History(format!("failed to push oid: {e}")))?;
        } else {
            revwalk
                .push_head()
                .map_err(|e| CalderaError::History(format!("failed to push HEAD: {e}")))?;
        }

        let cutoff = compute_cutoff(self.options.since_days);
        let mut events = Vec::new();

        for oid_result in revwalk {
            if cancel.is_cancelled() {
                return Err(CalderaError::Cancelled);
            }

            let oid =
                oid_result.map_err(|e| CalderaError::History(format!("revwalk error: {e}")))?;
            let commit = repo
                .find_commit(oid)
                .map_err(|e| CalderaError::History(format!("failed to find commit: {e}")))?;

            let timestamp = commit.time().seconds();
            if let Some(cutoff) = cutoff {
                if timestamp < cutoff {
                    break;
                }
            }

            let touches = extract_touches(&repo, &commit)?;

            // Skip outsized commits (bulk reformats, vendored imports) when
            // a limit is configured.
            if self.options.max_files_per_commit > 0
                && touches.len() > self.options.max_files_per_commit
            {
                continue;
            }

            let author = commit.author();
            let hash = oid.to_string();

            events.push(CommitEvent {
                id: hash[..hash.len().min(8)].to_string(),
                author: author.name().unwrap_or("unknown").to_string(),
                timestamp,
                summary: commit
                    .message()
                    .unwrap_or("")
                    .lines()
                    .next()
                    .unwrap_or("")
                    .to_string(),
                touches,
            });
        }

        Ok(events)
    }
}

fn compute_cutoff(since_days: u64) -> Option<i64> {
    if since_days == 0 {
        return None;
    }
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    Some(now - (since_days as i64 * 86400))
}

fn extract_touches(
    repo: &Repository,
    commit: &git2::Commit,
) -> Result<Vec<PathTouch>, CalderaError> {
    let commit_tree = commit
        .tree()
        .map_err(|e| CalderaError::History(format!("failed to get commit tree: {e}")))?;

    let parent_tree = if commit.parent_count() > 0 {
        let parent = commit
            .parent(0)
            .map_err(|e| CalderaError::History(format!("failed to get parent: {e}")))?;
        Some(
            parent
                .tree()
                .map_err(|e| CalderaError::History(format!("failed to get parent tree: {e}")))?,
        )
    } else {
        None
    };

    let mut diff_opts = DiffOptions::new();
    let mut diff = repo
        .diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&commit_tree),
            Some(&mut diff_opts),
        )
        .map_err(|e| CalderaError::History(format!("failed to compute diff: {e}")))?;

    let mut find_opts = git2::DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(|e| CalderaError::History(format!("failed to find renames: {e}")))?;

    let mut touches = Vec::new();

    for delta in diff.deltas() {
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|p| !p.is_empty());
        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|p| !p.is_empty());

        let touch = match delta.status() {
            Delta::Added => PathTouch {
                old_path: None,
                new_path,
            },
            Delta::Deleted => PathTouch {
                old_path,
                new_path: None,
            },
            Delta::Renamed => PathTouch {
                old_path,
                new_path,
            },
            // Everything else (modified, typechange, copied) counts as an
            // in-place touch of the current path.
            _ => PathTouch {
                old_path: new_path.clone(),
                new_path,
            },
        };

        if touch.old_path.is_none() && touch.new_path.is_none() {
            continue;
        }
        touches.push(touch);
    }

    Ok(touches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_touch_classification() {
        let added = PathTouch {
            old_path: None,
            new_path: Some("new.rs".into()),
        };
        let deleted = PathTouch {
            old_path: Some("gone.rs".into()),
            new_path: None,
        };
        let renamed = PathTouch {
            old_path: Some("a.rs".into()),
            new_path: Some("b.rs".into()),
        };
        let modified = PathTouch {
            old_path: Some("same.rs".into()),
            new_path: Some("same.rs".into()),
        };

        assert!(!added.is_rename());
        assert!(deleted.is_deletion());
        assert!(renamed.is_rename());
        assert!(!modified.is_rename());
        assert_eq!(deleted.effective_path(), Some("gone.rs"));
        assert_eq!(renamed.effective_path(), Some("b.rs"));
    }

    #[test]
    fn cutoff_disabled_when_zero_days() {
        assert!(compute_cutoff(0).is_none());
        assert!(compute_cutoff(30).is_some());
    }

    #[test]
    fn open_fails_on_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        let source = GitSource::new(dir.path(), HistoryConfig::default());
        let err = source.events(&CancelFlag::new()).unwrap_err();
        assert!(matches!(err, CalderaError::History(_)));
    }

    #[test]
    fn cancelled_flag_aborts_walk() {
        // Only meaningful against a real repository; use this workspace's.
        let Some(repo_path) = find_repo_root() else {
            return;
        };
        let source = GitSource::new(&repo_path, HistoryConfig::default());
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = source.events(&cancel).unwrap_err();
        assert!(matches!(err, CalderaError::Cancelled));
    }

    #[test]
    fn mine_workspace_repo_returns_events() {
        let Some(repo_path) = find_repo_root() else {
            return;
        };
        let source = GitSource::new(&repo_path, HistoryConfig::default());
        let events = source.events(&CancelFlag::new()).unwrap();
        assert!(!events.is_empty(), "repo should have commits");
        let first = &events[0];
        assert!(!first.id.is_empty());
        assert!(first.timestamp > 0);
    }

    #[test]
    fn large_commits_are_skipped_when_limited() {
        let Some(repo_path) = find_repo_root() else {
            return;
        };
        let options = HistoryConfig {
            max_files_per_commit: 2,
            ..HistoryConfig::default()
        };
        let source = GitSource::new(&repo_path, options);
        let events = source.events(&CancelFlag::new()).unwrap();
        for event in &events {
            assert!(
                event.touches.len() <= 2,
                "commit {} has {} touches, expected <= 2",
                event.id,
                event.touches.len()
            );
        }
    }

    fn find_repo_root() -> Option<PathBuf> {
        let mut path = std::env::current_dir().ok()?;
        loop {
            if path.join(".git").exists() {
                return Some(path);
            }
            if !path.pop() {
                return None;
            }
        }
    }
}

//! Per-file churn extraction with rename-chain resolution.
//!
//! Folds a commit-event stream into one revision count per logical file.
//! Renames are resolved through a union-find alias map whose set
//! representative is always the file's most recent name, so churn recorded
//! under any historical path merges into the current path's record.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::mining::CommitEvent;

/// Revision count for one logical file.
///
/// `deleted` flags files whose most recent event removed them; whether they
/// appear in the final ranking is a join-time decision made downstream, not
/// here.
///
/// # Examples
///
/// ```
/// use caldera_history::churn::ChurnRecord;
///
/// let record = ChurnRecord {
///     path: "src/resolver.py".into(),
///     revisions: 12,
///     deleted: false,
/// };
/// assert_eq!(record.revisions, 12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnRecord {
    /// Canonical repository-relative path (the file's current name).
    pub path: String,
    /// Number of commits touching this file or any of its former names.
    pub revisions: u32,
    /// Whether the file's most recent event was a deletion.
    pub deleted: bool,
}

/// Union-find alias map from historical paths to a file's current name.
///
/// Roots carry a label: the most recent name seen for the set. Linking always
/// attaches one root beneath another, so chains stay acyclic even when a file
/// is renamed back to a former name.
#[derive(Debug, Default)]
struct AliasMap {
    parent: HashMap<String, String>,
    label: HashMap<String, String>,
}

impl AliasMap {
    /// Find the set root for `path`, with path compression.
    fn find(&mut self, path: &str) -> String {
        let mut root = path.to_string();
        while let Some(next) = self.parent.get(&root) {
            root = next.clone();
        }
        // Compress the chain we just walked.
        let mut cursor = path.to_string();
        while cursor != root {
            let next = self.parent.insert(cursor.clone(), root.clone());
            cursor = next.unwrap_or_else(|| root.clone());
        }
        root
    }

    /// Record a rename `old` → `new`, making `new` the set's current name.
    fn record_rename(&mut self, old: &str, new: &str) {
        let old_root = self.find(old);
        let new_root = self.find(new);
        if old_root != new_root {
            self.parent.insert(old_root, new_root.clone());
        }
        self.label.insert(new_root, new.to_string());
    }

    /// The current canonical name for `path`.
    fn canonical(&mut self, path: &str) -> String {
        let root = self.find(path);
        self.label.get(&root).cloned().unwrap_or(root)
    }
}

/// Fold a commit-event stream into per-file churn records.
///
/// Each commit increments a file's count by exactly 1, no matter how many
/// touches within that commit resolve to the same file. Counting is
/// commutative, so the stream may arrive in chronological or
/// reverse-chronological order; rename edges are replayed oldest-first
/// internally before any counting happens.
///
/// Files with zero recorded history simply produce no record here — the
/// downstream join treats them as churn 0.
///
/// # Examples
///
/// ```
/// use caldera_history::churn::extract_churn;
/// use caldera_history::mining::{CommitEvent, PathTouch};
///
/// let touch = |p: &str| PathTouch {
///     old_path: Some(p.into()),
///     new_path: Some(p.into()),
/// };
/// let events = vec![
///     CommitEvent {
///         id: "c1".into(),
///         author: "alice".into(),
///         timestamp: 1,
///         summary: "one".into(),
///         touches: vec![touch("a.py")],
///     },
///     CommitEvent {
///         id: "c2".into(),
///         author: "alice".into(),
///         timestamp: 2,
///         summary: "two".into(),
///         touches: vec![touch("a.py"), touch("b.py")],
///     },
/// ];
/// let records = extract_churn(&events);
/// let a = records.iter().find(|r| r.path == "a.py").unwrap();
/// let b = records.iter().find(|r| r.path == "b.py").unwrap();
/// assert_eq!(a.revisions, 2);
/// assert_eq!(b.revisions, 1);
/// ```
pub fn extract_churn(events: &[CommitEvent]) -> Vec<ChurnRecord> {
    let mut aliases = AliasMap::default();

    // Replay rename edges oldest-first so each set's label ends up being the
    // file's most recent name, even across rename-backs.
    let mut ordered: Vec<&CommitEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    for event in &ordered {
        for touch in &event.touches {
            if touch.is_rename() {
                if let (Some(old), Some(new)) = (&touch.old_path, &touch.new_path) {
                    aliases.record_rename(old, new);
                }
            }
        }
    }

    // Counting pass: one increment per (commit, logical file).
    let mut revisions: HashMap<String, u32> = HashMap::new();
    let mut last_event: HashMap<String, (i64, bool)> = HashMap::new();

    for event in &ordered {
        let mut seen: HashSet<String> = HashSet::new();
        for touch in &event.touches {
            let Some(path) = touch.effective_path() else {
                continue;
            };
            let key = aliases.canonical(path);
            if !seen.insert(key.clone()) {
                continue;
            }
            *revisions.entry(key.clone()).or_default() += 1;

            let entry = last_event.entry(key).or_insert((i64::MIN, false));
            if event.timestamp >= entry.0 {
                *entry = (event.timestamp, touch.is_deletion());
            }
        }
    }

    let mut records: Vec<ChurnRecord> = revisions
        .into_iter()
        .map(|(path, revisions)| {
            let deleted = last_event.get(&path).map(|e| e.1).unwrap_or(false);
            ChurnRecord {
                path,
                revisions,
                deleted,
            }
        })
        .collect();

    records.sort_by(|a, b| a.path.cmp(&b.path));
    records
}

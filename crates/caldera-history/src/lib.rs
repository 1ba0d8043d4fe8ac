//! Git history extraction and per-file churn counting.
//!
//! Mines commit history via git2 into a backend-agnostic event stream, then
//! folds that stream into per-file revision counts with rename-chain
//! resolution, so a file's churn survives renames and moves.

pub mod churn;
pub mod mining;

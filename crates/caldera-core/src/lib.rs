//! Core types, configuration, and error handling for caldera.
//!
//! This crate provides the shared foundation used by all other caldera crates:
//! - [`CalderaError`] — unified error type using `thiserror`
//! - [`CalderaConfig`] — configuration loaded from `.caldera.toml`
//! - Shared types: [`OutputFormat`], [`Warning`], [`CancelFlag`]

mod config;
mod error;
mod types;

pub use config::{CalderaConfig, CombinePolicy, FilesConfig, HistoryConfig, ScoringConfig};
pub use error::CalderaError;
pub use types::{CancelFlag, OutputFormat, Warning};

/// A convenience `Result` type for caldera operations.
pub type Result<T> = std::result::Result<T, CalderaError>;

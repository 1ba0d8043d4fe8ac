use std::path::PathBuf;

/// Errors that can occur across the caldera pipeline.
///
/// Fatal variants ([`CalderaError::History`], [`CalderaError::Complexity`])
/// abort a run before any ranking is emitted. Per-file complexity failures
/// are not errors at all — they surface as [`crate::Warning`] values next to
/// an otherwise complete ranking.
///
/// # Examples
///
/// ```
/// use caldera_core::CalderaError;
///
/// let err = CalderaError::History("not a git repository".into());
/// assert!(err.to_string().contains("not a git repository"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CalderaError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The commit stream cannot be obtained at all. Fatal.
    #[error("history unavailable: {0}")]
    History(String),

    /// The complexity backend cannot be invoked at all. Fatal.
    #[error("complexity source unavailable: {0}")]
    Complexity(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file or directory was not found.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The run was cancelled via [`crate::CancelFlag`].
    #[error("analysis cancelled")]
    Cancelled,
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CalderaError;

/// Top-level configuration loaded from `.caldera.toml`.
///
/// Resolution is layered: CLI flags > local config file > defaults. The
/// config is immutable for the duration of a run; there are no module-level
/// defaults to mutate.
///
/// # Examples
///
/// ```
/// use caldera_core::{CalderaConfig, CombinePolicy};
///
/// let config = CalderaConfig::default();
/// assert_eq!(config.scoring.combine, CombinePolicy::GeometricMean);
/// assert_eq!(config.history.since_days, 0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalderaConfig {
    /// History mining settings.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Score combination settings.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// File discovery settings.
    #[serde(default)]
    pub files: FilesConfig,
}

impl CalderaConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CalderaError::Io`] if the file cannot be read, or
    /// [`CalderaError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use caldera_core::CalderaConfig;
    /// use std::path::Path;
    ///
    /// let config = CalderaConfig::from_file(Path::new(".caldera.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, CalderaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CalderaError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use caldera_core::CalderaConfig;
    ///
    /// let toml = r#"
    /// [history]
    /// since_days = 180
    /// "#;
    /// let config = CalderaConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.history.since_days, 180);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CalderaError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// History mining configuration.
///
/// # Examples
///
/// ```
/// use caldera_core::HistoryConfig;
///
/// let config = HistoryConfig::default();
/// assert_eq!(config.since_days, 0);
/// assert_eq!(config.max_files_per_commit, 0);
/// assert!(config.branch.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Only include commits from the last N days; 0 means full history.
    #[serde(default)]
    pub since_days: u64,
    /// Skip commits touching more files than this; 0 means unlimited.
    #[serde(default)]
    pub max_files_per_commit: usize,
    /// Branch to walk (default: HEAD).
    pub branch: Option<String>,
}

/// How normalized churn and complexity are combined into one score.
///
/// # Examples
///
/// ```
/// use caldera_core::CombinePolicy;
///
/// let policy = CombinePolicy::default();
/// assert_eq!(policy, CombinePolicy::GeometricMean);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinePolicy {
    /// `sqrt(churn * complexity)` — a hotspot needs both signals.
    #[default]
    GeometricMean,
    /// `churn * complexity`.
    Product,
    /// `w * churn + (1 - w) * complexity`.
    WeightedSum,
}

/// Score combination configuration.
///
/// # Examples
///
/// ```
/// use caldera_core::ScoringConfig;
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.churn_weight, 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Combination policy (default: geometric mean).
    #[serde(default)]
    pub combine: CombinePolicy,
    /// Churn weight for the weighted-sum policy (default: 0.5).
    #[serde(default = "default_churn_weight")]
    pub churn_weight: f64,
}

fn default_churn_weight() -> f64 {
    0.5
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            combine: CombinePolicy::default(),
            churn_weight: default_churn_weight(),
        }
    }
}

/// File discovery configuration.
///
/// # Examples
///
/// ```
/// use caldera_core::FilesConfig;
///
/// let config = FilesConfig::default();
/// assert_eq!(config.max_file_size, 1_048_576);
/// assert!(config.extensions.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Maximum file size in bytes to analyze (default: 1 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Extension allowlist without dots (e.g. `["rs", "py"]`); empty means
    /// every supported language.
    #[serde(default)]
    pub extensions: Vec<String>,
}

fn default_max_file_size() -> u64 {
    1_048_576
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            extensions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CalderaConfig::default();
        assert_eq!(config.history.since_days, 0);
        assert_eq!(config.history.max_files_per_commit, 0);
        assert!(config.history.branch.is_none());
        assert_eq!(config.scoring.combine, CombinePolicy::GeometricMean);
        assert_eq!(config.scoring.churn_weight, 0.5);
        assert_eq!(config.files.max_file_size, 1_048_576);
        assert!(config.files.extensions.is_empty());
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[history]
since_days = 90
"#;
        let config = CalderaConfig::from_toml(toml).unwrap();
        assert_eq!(config.history.since_days, 90);
        assert_eq!(config.scoring.combine, CombinePolicy::GeometricMean);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[history]
since_days = 365
max_files_per_commit = 50
branch = "main"

[scoring]
combine = "weighted-sum"
churn_weight = 0.7

[files]
max_file_size = 524288
extensions = ["rs", "py"]
"#;
        let config = CalderaConfig::from_toml(toml).unwrap();
        assert_eq!(config.history.since_days, 365);
        assert_eq!(config.history.max_files_per_commit, 50);
        assert_eq!(config.history.branch.as_deref(), Some("main"));
        assert_eq!(config.scoring.combine, CombinePolicy::WeightedSum);
        assert_eq!(config.scoring.churn_weight, 0.7);
        assert_eq!(config.files.max_file_size, 524_288);
        assert_eq!(config.files.extensions, vec!["rs", "py"]);
    }

    #[test]
    fn parse_combine_policies() {
        for (text, policy) in [
            ("geometric-mean", CombinePolicy::GeometricMean),
            ("product", CombinePolicy::Product),
            ("weighted-sum", CombinePolicy::WeightedSum),
        ] {
            let toml = format!("[scoring]\ncombine = \"{text}\"\n");
            let config = CalderaConfig::from_toml(&toml).unwrap();
            assert_eq!(config.scoring.combine, policy);
        }
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = CalderaConfig::from_toml("").unwrap();
        assert_eq!(config.scoring.churn_weight, 0.5);
        assert_eq!(config.files.max_file_size, 1_048_576);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = CalderaConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }
}

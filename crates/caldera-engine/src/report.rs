//! Ranking output formatting.
//!
//! Renders an ordered hotspot list as a text table, JSON (camelCase), or a
//! Markdown table. Formatting never reorders or recomputes anything; the
//! `limit` is purely a display decision made by the caller's CLI flag.

use caldera_core::{CalderaError, Warning};

use crate::rank::HotspotRecord;

/// Render the ranking as an aligned text table.
///
/// # Examples
///
/// ```
/// use caldera_engine::rank::HotspotRecord;
/// use caldera_engine::report::format_text;
///
/// let records = vec![HotspotRecord {
///     path: "src/resolver.py".into(),
///     churn: 12,
///     complexity: 45,
///     score: 0.87,
/// }];
/// let out = format_text(&records, &[], 10);
/// assert!(out.contains("src/resolver.py"));
/// assert!(out.contains("score=0.87"));
/// ```
pub fn format_text(records: &[HotspotRecord], warnings: &[Warning], limit: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("Hotspots ({} files):\n", records.len()));
    out.push_str(&format!("{:-<72}\n", ""));

    if records.is_empty() {
        out.push_str("  No files to rank.\n");
    }

    for (i, r) in records.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<44} score={:.2}  churn={}  complexity={}\n",
            i + 1,
            r.path,
            r.score,
            r.churn,
            r.complexity,
        ));
    }

    if !warnings.is_empty() {
        out.push('\n');
        out.push_str(&format!("Warnings ({}):\n", warnings.len()));
        for w in warnings {
            out.push_str(&format!("  {w}\n"));
        }
    }

    out
}

/// Render the ranking as pretty-printed JSON with camelCase keys.
///
/// # Errors
///
/// Returns [`CalderaError::Serialization`] if encoding fails.
///
/// # Examples
///
/// ```
/// use caldera_engine::report::format_json;
///
/// let out = format_json(&[], &[], 10).unwrap();
/// assert!(out.contains("\"hotspots\""));
/// ```
pub fn format_json(
    records: &[HotspotRecord],
    warnings: &[Warning],
    limit: usize,
) -> Result<String, CalderaError> {
    let top: Vec<&HotspotRecord> = records.iter().take(limit).collect();
    let value = serde_json::json!({
        "filesRanked": records.len(),
        "hotspots": top,
        "warnings": warnings,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Render the ranking as a Markdown table.
///
/// # Examples
///
/// ```
/// use caldera_engine::rank::HotspotRecord;
/// use caldera_engine::report::format_markdown;
///
/// let records = vec![HotspotRecord {
///     path: "a.py".into(),
///     churn: 2,
///     complexity: 10,
///     score: 1.0,
/// }];
/// let out = format_markdown(&records, &[], 10);
/// assert!(out.contains("| 1 | `a.py` |"));
/// ```
pub fn format_markdown(records: &[HotspotRecord], warnings: &[Warning], limit: usize) -> String {
    let mut out = String::new();

    out.push_str("# Hotspot Analysis\n\n");
    out.push_str(&format!("**Files ranked:** {}\n\n", records.len()));

    if records.is_empty() {
        out.push_str("No files to rank.\n");
    } else {
        out.push_str("| Rank | File | Score | Churn | Complexity |\n");
        out.push_str("|------|------|-------|-------|------------|\n");
        for (i, r) in records.iter().take(limit).enumerate() {
            out.push_str(&format!(
                "| {} | `{}` | {:.2} | {} | {} |\n",
                i + 1,
                r.path,
                r.score,
                r.churn,
                r.complexity,
            ));
        }
    }

    if !warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for w in warnings {
            out.push_str(&format!("- `{}`: {}\n", w.path, w.message));
        }
    }

    out
}

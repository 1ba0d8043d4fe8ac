//! Terminal scatter-plot rendering.
//!
//! Draws the same HotspotRecord list the tabular reporter consumes as a 2-D
//! character grid: churn on the x axis, complexity on the y axis, glyph
//! encoding the score band. A visualization, not a recomputation.

use crate::rank::HotspotRecord;

/// Grid width in columns.
const PLOT_WIDTH: usize = 64;
/// Grid height in rows.
const PLOT_HEIGHT: usize = 20;

/// Render the hotspot list as a scatter plot.
///
/// Points with higher scores use heavier glyphs and win collisions, so the
/// files worth looking at stay visible even in dense corners.
///
/// # Examples
///
/// ```
/// use caldera_engine::plot::render_scatter;
/// use caldera_engine::rank::HotspotRecord;
///
/// let records = vec![HotspotRecord {
///     path: "a.py".into(),
///     churn: 5,
///     complexity: 10,
///     score: 0.9,
/// }];
/// let out = render_scatter(&records);
/// assert!(out.contains("churn"));
/// ```
pub fn render_scatter(records: &[HotspotRecord]) -> String {
    if records.is_empty() {
        return "No files to plot.\n".to_string();
    }

    let max_churn = records.iter().map(|r| r.churn).max().unwrap_or(0).max(1);
    let max_complexity = records
        .iter()
        .map(|r| r.complexity)
        .max()
        .unwrap_or(0)
        .max(1);

    let mut grid = vec![vec![' '; PLOT_WIDTH]; PLOT_HEIGHT];
    let mut rank = vec![vec![f64::NEG_INFINITY; PLOT_WIDTH]; PLOT_HEIGHT];

    for r in records {
        let col = scale(f64::from(r.churn), f64::from(max_churn), PLOT_WIDTH);
        let row = scale(r.complexity as f64, max_complexity as f64, PLOT_HEIGHT);
        // Row 0 is the top of the grid; high complexity plots high.
        let row = PLOT_HEIGHT - 1 - row;
        if r.score > rank[row][col] {
            rank[row][col] = r.score;
            grid[row][col] = glyph(r.score);
        }
    }

    let mut out = String::new();
    out.push_str(&format!("complexity (max {max_complexity})\n"));
    for row in &grid {
        out.push_str("  |");
        out.extend(row.iter());
        out.push('\n');
    }
    out.push_str("  +");
    out.push_str(&"-".repeat(PLOT_WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "   0{:>width$}\n",
        format!("churn (max {max_churn})"),
        width = PLOT_WIDTH - 1
    ));
    out.push_str("\n  score: . <0.25   o <0.5   O <0.75   @ >=0.75\n");
    out
}

fn scale(value: f64, max: f64, cells: usize) -> usize {
    let ratio = (value / max).clamp(0.0, 1.0);
    ((ratio * (cells - 1) as f64).round() as usize).min(cells - 1)
}

fn glyph(score: f64) -> char {
    if score >= 0.75 {
        '@'
    } else if score >= 0.5 {
        'O'
    } else if score >= 0.25 {
        'o'
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, churn: u32, complexity: u64, score: f64) -> HotspotRecord {
        HotspotRecord {
            path: path.into(),
            churn,
            complexity,
            score,
        }
    }

    #[test]
    fn empty_input_says_so() {
        assert_eq!(render_scatter(&[]), "No files to plot.\n");
    }

    #[test]
    fn plot_contains_axes_and_legend() {
        let out = render_scatter(&[record("a.py", 5, 10, 0.9)]);
        assert!(out.contains("complexity (max 10)"));
        assert!(out.contains("churn (max 5)"));
        assert!(out.contains("score:"));
    }

    fn grid_of(out: &str) -> String {
        // Everything above the legend line.
        out.split("score:").next().unwrap().to_string()
    }

    #[test]
    fn high_score_point_uses_heavy_glyph() {
        let out = render_scatter(&[record("hot.py", 10, 10, 0.9)]);
        assert!(grid_of(&out).contains('@'));
    }

    #[test]
    fn low_score_point_uses_light_glyph() {
        let out = render_scatter(&[record("calm.py", 10, 10, 0.1)]);
        assert!(grid_of(&out).contains('.'));
        assert!(!grid_of(&out).contains('@'));
    }

    #[test]
    fn higher_score_wins_collisions() {
        // Same cell: identical raw values, different scores.
        let records = vec![
            record("low.py", 10, 10, 0.1),
            record("high.py", 10, 10, 0.9),
        ];
        let out = render_scatter(&records);
        let grid = grid_of(&out);
        assert!(grid.contains('@'));
        assert!(!grid.contains('.'));
    }

    #[test]
    fn glyph_bands() {
        assert_eq!(glyph(0.0), '.');
        assert_eq!(glyph(0.3), 'o');
        assert_eq!(glyph(0.6), 'O');
        assert_eq!(glyph(0.8), '@');
    }

    #[test]
    fn scale_is_bounded() {
        assert_eq!(scale(0.0, 10.0, 64), 0);
        assert_eq!(scale(10.0, 10.0, 64), 63);
        assert_eq!(scale(20.0, 10.0, 64), 63);
    }
}

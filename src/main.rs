use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};

use caldera_core::{CalderaConfig, CancelFlag, OutputFormat};
use caldera_engine::{plot, report};

#[derive(Parser)]
#[command(
    name = "caldera",
    version,
    about = "Find refactoring hotspots: files that are both complex and change often",
    long_about = "Caldera ranks the files in a repository by combining two signals:\n\
                   how often each file changes (churn, mined from git history) and how\n\
                   complex it currently is (cyclomatic complexity, summed per file).\n\
                   Files scoring high on both are where refactoring effort pays off.\n\n\
                   Examples:\n  \
                     caldera .                       Rank the current repository\n  \
                     caldera ~/src/app --limit 10    Show only the top 10 files\n  \
                     caldera . --plot                Scatter plot instead of a table\n  \
                     caldera . --format json         Machine-readable output\n  \
                     caldera . --since-days 180      Only consider recent history"
)]
struct Cli {
    /// Repository to analyze
    path: PathBuf,

    /// Present results as a scatter plot instead of a table
    #[arg(long, short)]
    plot: bool,

    /// Output format
    #[arg(
        long,
        default_value = "text",
        long_help = "Output format for the ranking.\n\n\
                       Formats:\n  \
                         text      Human-readable table (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Maximum rows to display (the full ranking is always computed)
    #[arg(long, default_value = "25")]
    limit: usize,

    /// Only include commits from the last N days (0 = full history)
    #[arg(long)]
    since_days: Option<u64>,

    /// Path to configuration file (default: .caldera.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CalderaConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".caldera.toml");
            if default_path.exists() {
                CalderaConfig::from_file(default_path).into_diagnostic()?
            } else {
                CalderaConfig::default()
            }
        }
    };
    if let Some(days) = cli.since_days {
        config.history.since_days = days;
    }

    if !cli.path.exists() {
        miette::bail!(miette::miette!(
            help = "Check the path and try again",
            "Path not found: {}",
            cli.path.display()
        ));
    }

    // Hint: not a git repository
    if !cli.path.join(".git").exists() && git2::Repository::discover(&cli.path).is_err() {
        miette::bail!(miette::miette!(
            help = "Point caldera at a git repository root",
            "Not a git repository: {}",
            cli.path.display()
        ));
    }

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
            .into_diagnostic()?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(format!("Analyzing {}...", cli.path.display()));

    let cancel = CancelFlag::new();
    let analysis = caldera_engine::analyze(&cli.path, &config, &cancel).into_diagnostic()?;

    spinner.finish_and_clear();
    eprintln!(
        "Analyzed {} commits across {} files.",
        analysis.commits, analysis.files
    );

    if cli.plot {
        // Warnings still surface next to the plot, just not inside it.
        for w in &analysis.warnings {
            eprintln!("warning: {w}");
        }
        print!("{}", plot::render_scatter(&analysis.records));
        return Ok(());
    }

    let rendered = match cli.format {
        OutputFormat::Text => report::format_text(&analysis.records, &analysis.warnings, cli.limit),
        OutputFormat::Json => {
            report::format_json(&analysis.records, &analysis.warnings, cli.limit)
                .into_diagnostic()?
        }
        OutputFormat::Markdown => {
            report::format_markdown(&analysis.records, &analysis.warnings, cli.limit)
        }
    };
    print!("{rendered}");

    Ok(())
}

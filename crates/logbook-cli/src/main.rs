//! `logbook`: aggregate git commit history across repositories into
//! chronological logbooks.
//!
//! Reads repositories from a JSON configuration file or the command line,
//! runs the core aggregation pipeline, and writes markdown/HTML logbooks
//! plus optional CSV and summary exports. The exit status distinguishes
//! clean runs from partial and total repository failure.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use logbook_core::{
    init_tracing, run_pipeline, FilterOverrides, GitCli, PoolOptions, RepositorySpec,
};

mod config;

use config::{load, parse_date, FileConfig};

#[derive(Parser)]
#[command(name = "logbook")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate git commit history across repositories into chronological logbooks", long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repository paths or URLs (overrides the configured list)
    #[arg(long, num_args = 1.., value_name = "REF")]
    repos: Vec<String>,

    /// Base name for the generated logbook files
    #[arg(long, default_value = "commit_log")]
    output: String,

    /// Also write a CSV export to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write the run summary as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Only include commits on or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    since: Option<String>,

    /// Only include commits on or before this date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    until: Option<String>,

    /// Filter by author name (forwarded to the log capability)
    #[arg(long)]
    author: Option<String>,

    /// Restrict extraction to one branch (default: all branches)
    #[arg(long)]
    branch: Option<String>,

    /// Number of parallel repository workers
    #[arg(long)]
    workers: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

/// Exit policy: 0 when no repository failed, 2 on partial failure, 3 when
/// every repository failed. Run-fatal errors exit 1 via `main`.
fn exit_status(failed: usize, total: usize) -> u8 {
    if failed == 0 {
        0
    } else if failed == total {
        3
    } else {
        2
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = match &cli.config {
        Some(path) => load(path)?,
        None => FileConfig::default(),
    };

    let repositories: Vec<RepositorySpec> = if cli.repos.is_empty() {
        config.repositories.clone()
    } else {
        cli.repos
            .iter()
            .map(|reference| RepositorySpec::from_reference(reference))
            .collect()
    };
    let total = repositories.len();

    let overrides = FilterOverrides {
        since: cli.since.as_deref().map(parse_date).transpose()?,
        until: cli.until.as_deref().map(parse_date).transpose()?,
        author: cli.author.clone(),
        branch: cli.branch.clone(),
    };
    let criteria = config.criteria()?.with_overrides(overrides);
    let workers = cli.workers.or(config.parallel_workers).unwrap_or(4);

    let timeline = run_pipeline(
        repositories,
        criteria,
        Arc::new(GitCli::default()),
        PoolOptions {
            parallel_workers: workers,
        },
    )
    .await?;

    let md_path = format!("{}.md", cli.output);
    std::fs::write(&md_path, logbook_report::markdown::render(&timeline))
        .with_context(|| format!("write {md_path}"))?;
    let html_path = format!("{}.html", cli.output);
    std::fs::write(&html_path, logbook_report::html::render(&timeline))
        .with_context(|| format!("write {html_path}"))?;
    info!(markdown = %md_path, html = %html_path, "generated logbook files");

    if let Some(path) = &cli.csv {
        std::fs::write(path, logbook_report::csv::render(&timeline))
            .with_context(|| format!("write {}", path.display()))?;
        info!(csv = %path.display(), "exported CSV");
    }
    if let Some(path) = &cli.summary_json {
        let summary =
            serde_json::to_string_pretty(&timeline.summary).context("serialize run summary")?;
        std::fs::write(path, summary).with_context(|| format!("write {}", path.display()))?;
    }

    let failed = timeline.summary.failure_count();
    if failed > 0 {
        warn!(failed, total, "repositories failed; see the failure section of the report");
    }
    info!(
        total_commits = timeline.summary.total_commits,
        skipped = timeline.summary.skipped_records,
        "logbook run complete"
    );

    Ok(exit_status(failed, total))
}

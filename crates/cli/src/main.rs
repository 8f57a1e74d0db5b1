use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use codex_cli::{write_outputs, CodexConfig, SnapshotFetcher, REPORT_FILE};
use codex_protocol::RunReport;
use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "codex")]
#[command(about = "Build the multi-language codex catalog from entry snapshots", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl, close, reconcile and write the catalog
    Run(RunArgs),

    /// Print the completeness counters of a written run
    Report(ReportArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Config file (defaults to ./codex.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snapshot directory with listings/, entries/ and item_types/
    #[arg(long, default_value = "snapshot")]
    input: PathBuf,

    /// Output directory
    #[arg(long, default_value = "out")]
    output: PathBuf,

    /// Override the configured closure round budget
    #[arg(long)]
    round_budget: Option<u32>,
}

#[derive(Args)]
struct ReportArgs {
    /// Output directory of a previous run
    output: PathBuf,

    /// Print the raw report JSON instead of the summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Run(args) => run(args).await?,
        Commands::Report(args) => report(args).await?,
    }

    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let mut config = CodexConfig::resolve(args.config.as_deref(), &cwd)?;
    if let Some(round_budget) = args.round_budget {
        config.round_budget = round_budget;
    }

    let fetcher = SnapshotFetcher::load(&args.input, &config.languages)?;
    let output = codex_cli::run(&config, Arc::new(fetcher)).await?;
    let manifest = write_outputs(&args.output, &config.version, &output).await?;

    if !output.report.is_complete() {
        log::warn!(
            "Run incomplete: {} missing entries, {} unresolved references",
            output.report.unresolved_missing.len(),
            output.report.unresolved_references
        );
    }
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

async fn report(args: ReportArgs) -> Result<()> {
    let path = args.output.join(REPORT_FILE);
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let report: RunReport = serde_json::from_slice(&data)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print!("{}", render_report(&report)?);
    Ok(())
}

fn render_report(report: &RunReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "closure: {} after {} rounds",
        report.closure, report.rounds_consumed
    )?;
    for (language, categories) in &report.entry_counts {
        let counts: Vec<String> = categories
            .iter()
            .map(|(category, count)| format!("{category}={count}"))
            .collect();
        writeln!(out, "entries[{language}]: {}", counts.join(" "))?;
    }
    writeln!(out, "unresolved missing: {}", report.unresolved_missing.len())?;
    for key in &report.unresolved_missing {
        writeln!(out, "  - {key}")?;
    }
    for (language, keys) in &report.missing_by_language {
        writeln!(out, "missing[{language}]: {}", keys.len())?;
    }
    writeln!(out, "suppressed unreachable: {}", report.suppressed_unreachable)?;
    writeln!(out, "malformed references: {}", report.malformed_references)?;
    writeln!(out, "unresolved references: {}", report.unresolved_references)?;
    writeln!(out, "alignment mismatches: {}", report.alignment_mismatches)?;
    writeln!(out, "untranslated entries: {}", report.untranslated_entries)?;
    writeln!(out, "unknown fields: {}", report.unknown_fields)?;
    writeln!(out, "fetch failures: {}", report.fetch_failures)?;
    writeln!(
        out,
        "complete: {}",
        if report.is_complete() { "yes" } else { "no" }
    )?;
    Ok(out)
}

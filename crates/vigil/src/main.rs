use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vigil::config::{load_config, resolve_base_url, BASE_URL_ENV, DEFAULT_CONFIG_PATH};
use vigil::models::SuiteKind;
use vigil::reporter::{format_banner, persist};
use vigil::suite::load_suite_file;

#[derive(Parser, Debug)]
#[command(name = "vigil", about = "Contract smoke tests for the Fractal analytics API")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL of the service under test (overrides VIGIL_BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Where to write the JSON summary
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Run only these suites (repeatable)
    #[arg(long = "suite")]
    suites: Vec<SuiteKind>,

    /// Extra `[[cases]]` to append after the built-in suites
    #[arg(long)]
    suite_file: Option<String>,

    /// Suppress PASS/FAIL lines on stdout
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = load_config(config_path, cli.config.is_some())
        .with_context(|| format!("Failed to load config: {config_path}"))?;

    let base_url = resolve_base_url(
        &config,
        std::env::var(BASE_URL_ENV).ok(),
        cli.base_url.as_deref(),
    )?;

    let kinds = if cli.suites.is_empty() {
        config.suites.enabled.clone()
    } else {
        cli.suites.clone()
    };
    let extra = match &cli.suite_file {
        Some(path) => load_suite_file(path, config.target.default_timeout_seconds)?,
        None => Vec::new(),
    };
    let suite = vigil::build_suite(&config, &kinds, extra)?;

    let runner = vigil::build_runner(&config, &base_url)
        .context("Failed to build runner")?
        .with_console(!cli.quiet);

    if !cli.quiet {
        println!("{}", format_banner(runner.label(), &base_url));
    }
    info!(base_url = %base_url, cases = suite.len(), "Suite ready");

    let summary = runner.run(&suite).await;

    // A failed write is reported but leaves the verdict alone
    let report_path = cli
        .report
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.report.path));
    if let Err(e) = persist(&summary, &report_path) {
        error!(path = %report_path.display(), error = %e, "Failed to write summary");
    }

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

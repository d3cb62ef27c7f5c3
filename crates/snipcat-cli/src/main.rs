//! snipcat - categorize documentation code snippets.

mod ollama;
mod output;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use snipcat_core::config::CONFIG_FILE_NAME;
use snipcat_core::fs::RealFileSystem;
use snipcat_core::{
    BatchOptions, DisabledClassifier, ExternalClassifier, HeuristicMatcher, SnipcatConfig,
    discover_snippet_files, run_batch,
};
use tracing_subscriber::EnvFilter;

use crate::ollama::OllamaClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "snipcat", version, about = "Categorize documentation code snippets")]
struct Cli {
    /// Directory containing one snippet per file
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Config file (defaults to .snipcat.toml in PATH)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report sub-directory name
    #[arg(long)]
    project_name: Option<String>,

    /// Base directory for reports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Ollama model name
    #[arg(long)]
    model: Option<String>,

    /// Ollama base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Per-request classifier timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Do not contact the classifier; unmatched snippets end Uncategorized
    #[arg(long)]
    offline: bool,

    /// Do not flag duplicate snippets
    #[arg(long)]
    no_dedup: bool,

    /// Skip writing report files
    #[arg(long)]
    no_report: bool,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the heuristic rule table and exit
    #[arg(long)]
    list_rules: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SnipcatConfig) {
        if let Some(name) = &self.project_name {
            config.project_name = name.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.classifier.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.classifier.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.classifier.timeout_secs = timeout;
        }
        if self.no_dedup {
            config.dedup = false;
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<SnipcatConfig> {
    let mut config = match &cli.config {
        Some(path) => SnipcatConfig::load(path)?,
        None => {
            let default_path = cli.path.join(CONFIG_FILE_NAME);
            let path = default_path.is_file().then_some(default_path.as_path());
            let (config, warning) = SnipcatConfig::load_or_default(path);
            if let Some(warning) = warning {
                tracing::warn!("{}", warning);
            }
            config
        }
    };
    cli.apply_overrides(&mut config);

    for warning in config.validate()? {
        tracing::warn!("{}: {}", warning.field, warning.message);
    }
    Ok(config)
}

fn build_classifier(
    cli: &Cli,
    config: &SnipcatConfig,
) -> anyhow::Result<Box<dyn ExternalClassifier>> {
    if cli.offline {
        tracing::info!("Offline mode: external classifier disabled");
        return Ok(Box::new(DisabledClassifier));
    }
    let classifier = OllamaClassifier::new(&config.classifier)
        .context("Failed to build the classifier HTTP client")?;
    tracing::info!(
        model = %config.classifier.model,
        "Using external classifier at {}",
        classifier.url()
    );
    Ok(Box::new(classifier))
}

fn print_rules() {
    println!(
        "{} rules, substring window {} chars",
        snipcat_rules::rule_count(),
        snipcat_rules::SUBSTRING_WINDOW
    );
    for rule in snipcat_rules::RULES_DATA {
        let kind = match rule.kind {
            snipcat_rules::RuleKind::Prefix => "prefix",
            snipcat_rules::RuleKind::Substring => "substring",
        };
        println!(
            "{} {:<9} {:<18} {:<22} [{}]",
            rule.id.bold(),
            kind,
            format!("{:?}", rule.pattern),
            rule.category,
            rule.languages.join(", ")
        );
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.list_rules {
        print_rules();
        return Ok(());
    }

    let root: &Path = &cli.path;
    let config = load_config(cli)?;

    let files = discover_snippet_files(root, &config)
        .with_context(|| format!("Failed to discover snippets under {}", root.display()))?;
    let matcher =
        HeuristicMatcher::with_defaults().without_rules(config.rules.disabled_rules.as_slice());
    let classifier = build_classifier(cli, &config)?;

    let result = run_batch(
        root,
        &files,
        &BatchOptions::from(&config),
        &matcher,
        classifier.as_ref(),
        &RealFileSystem,
    );

    if !cli.no_report {
        let written = report::write_reports(&config.report_dir(), &result)?;
        tracing::debug!(?written, "reports written");
    }

    match cli.format {
        OutputFormat::Text => print!("{}", output::render_summary(&result, cli.offline)),
        OutputFormat::Json => {
            let counts = report::CountsReport::from_batch(&result);
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

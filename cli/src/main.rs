//! CLI entrypoint for ideastorm
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod args;

use anyhow::{Context, Result, bail};
use args::Cli;
use clap::Parser;
use ideastorm_application::{BrainstormInput, BrainstormUseCase, DispatchOptions, Orchestrator};
use ideastorm_infrastructure::{
    ConfigLoader, HttpClientFactory, JsonlUsageLogger, ReportWriter, providers_from_env,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Research context loaded from a `--context` JSON file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResearchContext {
    research_gaps: Vec<String>,
    weaknesses: Vec<String>,
    future_directions: Vec<String>,
}

fn load_context(path: &Path) -> Result<ResearchContext> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read context file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Could not parse context file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting ideastorm");

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Could not load configuration")?
    };

    // Discover enabled providers from the environment
    let providers = providers_from_env(&config.providers);
    if providers.is_empty() {
        bail!(
            "No providers configured. Set at least one of ANTHROPIC_API_KEY, \
             OPENAI_API_KEY, GEMINI_API_KEY, DEEPSEEK_API_KEY, DASHSCOPE_API_KEY."
        );
    }

    // === Dependency Injection ===
    let factory = match &cli.usage_log {
        Some(path) => match JsonlUsageLogger::new(path) {
            Some(logger) => HttpClientFactory::new().with_usage(Arc::new(logger)),
            None => bail!("Could not open usage log at {}", path.display()),
        },
        None => HttpClientFactory::new(),
    };

    let mut orchestrator = Orchestrator::new(Arc::new(factory));
    for provider in providers {
        orchestrator.add_provider(provider);
    }

    // Build input from topic, flags, and optional context file
    let context = match &cli.context {
        Some(path) => load_context(path)?,
        None => ResearchContext::default(),
    };

    let num_ideas = cli.ideas.unwrap_or(config.generation.num_ideas);
    let input = BrainstormInput::new(cli.topic.clone())
        .with_gaps(context.research_gaps)
        .with_weaknesses(context.weaknesses)
        .with_directions(context.future_directions)
        .with_num_ideas(num_ideas);

    // Ctrl-C cancels in-flight provider calls instead of killing the process
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let options = DispatchOptions::default()
        .with_concurrency(cli.concurrency.unwrap_or(config.generation.concurrency))
        .with_cancel(cancel);

    if !cli.quiet {
        println!();
        println!("Brainstorming {} ideas per provider", num_ideas);
        println!("Topic: {}", cli.topic);
        println!(
            "Providers: {}",
            orchestrator
                .providers()
                .iter()
                .map(|p| format!("{}/{}", p.provider, p.model))
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    // Execute
    let use_case = BrainstormUseCase::new(orchestrator);
    let outcome = use_case.execute(input, options).await?;

    // Per-provider breakdown
    if !cli.quiet {
        for result in &outcome.results {
            match &result.error {
                None => println!("[ok]   {}/{}", result.provider, result.model),
                Some(e) => println!("[fail] {}/{}: {}", result.provider, result.model, e),
            }
        }
        println!();
        for report in &outcome.reports {
            println!("{}/{}: {} ideas", report.provider, report.model, report.ideas.len());
            for idea in &report.ideas {
                if let Some(title) = idea.title() {
                    println!("  - {}", title);
                }
            }
        }
        println!();
    }

    // Reconciled summary
    let summary = &outcome.summary;
    if !summary.summary.is_empty() {
        println!("Summary: {}", summary.summary);
    }
    if !summary.consensus_themes.is_empty() {
        println!("\nConsensus themes:");
        for theme in &summary.consensus_themes {
            println!("  - {}", theme);
        }
    }
    if !summary.top_recommendations.is_empty() {
        println!("\nTop recommendations:");
        for idea in &summary.top_recommendations {
            let title = idea
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or("(untitled)");
            println!("  - {}", title);
        }
    }
    println!("\nUnique ideas: {}", summary.unique_ideas.len());

    // Persist reports if requested
    if let Some(dir) = &cli.output_dir {
        let writer = ReportWriter::new(dir)
            .with_context(|| format!("Could not create output directory {}", dir.display()))?;
        writer.write_reports(&outcome.reports)?;
        writer.write_summary(summary)?;
        if !cli.quiet {
            println!("\nReports written to {}", dir.display());
        }
    }

    Ok(())
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;

use ioclens_classifier::classify;
use ioclens_engine::{build_request, MergeEngine};
use ioclens_services::default_registry;

mod output;

#[derive(Parser)]
#[command(name = "ioclens")]
#[command(about = "Bulk IOC triage: classify indicators and aggregate lookup results", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for results)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify raw indicator text without performing any lookups
    Classify {
        /// File with raw indicator text, or '-' for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Emit JSON instead of text lines
        #[arg(long)]
        json: bool,
    },

    /// Aggregate a recorded lookup event stream over a batch of indicators
    Scan {
        /// File with raw indicator text, or '-' for stdin
        #[arg(long)]
        input: String,

        /// Recorded event stream (blank-line-delimited JSON records), or '-'
        /// for stdin
        #[arg(long)]
        stream: String,

        /// Comma-separated service ids (default: every bundled service)
        #[arg(long)]
        services: Option<String>,

        /// Emit the aggregation view as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .init();
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {source}"))
    }
}

fn run_classify(input: &str, json: bool) -> Result<()> {
    let raw = read_source(input)?;
    let mut seen = std::collections::HashSet::new();
    let mut classified = Vec::new();
    for token in raw.split(|c: char| c.is_whitespace() || c == ',') {
        let token = token.trim();
        if token.is_empty() || !seen.insert(token.to_string()) {
            continue;
        }
        classified.push((token.to_string(), classify(token)));
    }
    if classified.is_empty() {
        bail!("no indicators found in input");
    }

    if json {
        let items: Vec<serde_json::Value> = classified
            .iter()
            .map(|(value, ioc_type)| serde_json::json!({"value": value, "type": ioc_type}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (value, ioc_type) in &classified {
            println!("{value}\t{}", ioc_type.as_str());
        }
    }
    Ok(())
}

async fn run_scan(input: &str, stream: &str, services: Option<&str>, json: bool) -> Result<()> {
    if input == "-" && stream == "-" {
        bail!("--input and --stream cannot both read from stdin");
    }

    let registry = default_registry();
    let services: Vec<String> = match services {
        Some(list) => {
            let requested: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            for service in &requested {
                if !registry.contains(service) {
                    bail!(
                        "unknown service {:?} (available: {})",
                        service,
                        registry.service_ids().join(", ")
                    );
                }
            }
            requested
        }
        None => registry.service_ids(),
    };

    let raw = read_source(input)?;
    let (state, request) = build_request(&raw, &services)?;
    log::info!(
        "submitting {} indicators to {} services",
        request.iocs.len(),
        request.services.len()
    );

    let mut engine = MergeEngine::new(state, registry);
    if stream == "-" {
        engine.run_stream(tokio::io::stdin()).await;
    } else {
        let file = tokio::fs::File::open(stream)
            .await
            .with_context(|| format!("opening {stream}"))?;
        engine.run_stream(file).await;
    }

    let view = engine.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", output::render(&view));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Classify { input, json } => run_classify(&input, json),
        Commands::Scan {
            input,
            stream,
            services,
            json,
        } => run_scan(&input, &stream, services.as_deref(), json).await,
    }
}

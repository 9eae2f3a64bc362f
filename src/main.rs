// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use luna_lib::batch::{run_batch, BatchSummary};
use luna_lib::utils::env::load_env;
use luna_lib::utils::progress::batch_progress_bar;
use luna_lib::utils::service_config::ServiceConfig;
use luna_lib::{LunaService, Operation, PredictorRegistry};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the predictor parameter files (overrides LUNA_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print predictor availability
    Health,
    /// Print service name, loaded model count and operations
    Info,
    /// Run one operation on a JSON object read from a file or stdin
    Predict {
        /// Operation name or route, e.g. predict_symptoms or /predict/symptoms
        operation: String,
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Run a JSON Lines file of {"operation", "payload"} requests
    Batch {
        #[arg(long)]
        input: PathBuf,
        /// Overrides LUNA_BATCH_CONCURRENCY
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", rendered);
    Ok(())
}

fn read_payload(input: Option<&PathBuf>) -> Result<JsonValue> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };
    if raw.trim().is_empty() {
        return Ok(JsonValue::Null);
    }
    serde_json::from_str(&raw).context("Request is not valid JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();

    let cli = Cli::parse();
    let mut config = ServiceConfig::from_env();
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }
    config.log_config();

    let start = Instant::now();
    let registry = PredictorRegistry::load_from_dir(&config.model_dir);
    info!("Predictors ready in {:.2?}", start.elapsed());
    let service = LunaService::new(registry);

    match cli.command {
        Command::Health => print_json(&service.health_check())?,
        Command::Info => print_json(&service.service_info())?,
        Command::Predict { operation, input } => {
            let operation: Operation = operation.parse()?;
            let payload = read_payload(input.as_ref())?;
            print_json(&service.execute(operation, &payload))?;
        }
        Command::Batch { input, concurrency } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read batch file {}", input.display()))?;
            let lines: Vec<String> = raw
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect();
            let concurrency = concurrency.unwrap_or(config.batch_concurrency);
            let pb = batch_progress_bar(lines.len() as u64, config.progress_enabled);

            let responses = run_batch(&service, lines, concurrency, pb).await;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            for response in &responses {
                let line = serde_json::to_string(response).context("Failed to encode response")?;
                writeln!(out, "{}", line).context("Failed to write output")?;
            }
            BatchSummary::from_responses(&responses).log();
            info!("Batch finished in {:.2?}", start.elapsed());
        }
    }
    Ok(())
}

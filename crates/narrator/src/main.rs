//! roast: generate a roast or praise narrative from a repository metrics file.
//!
//! Reads a JSON object of metrics (file path or stdin) and prints the
//! generation result as JSON on stdout. Logs go to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use roast_core::config::{self, Config};
use roast_core::{MetricBundle, Mode};
use roast_narrator::Narrator;
use roast_templates::TemplateBank;

// ── CLI ─────────────────────────────────────────────────────────────

/// Generate a roast or praise narrative for a repository snapshot.
#[derive(Parser, Debug)]
#[command(name = "roast", version, about)]
struct Cli {
    /// Metrics JSON file. Reads stdin when omitted or "-".
    metrics: Option<PathBuf>,

    /// Narrative tone: roast or praise.
    #[arg(long, default_value = "roast", value_parser = parse_mode)]
    mode: Mode,

    /// Try the external model first (falls back to templates on failure).
    #[arg(long, env = "ROAST_USE_EXTERNAL")]
    external: bool,

    /// Repository label passed to the external model.
    #[arg(long, default_value = "repository")]
    label: String,

    /// Replace the built-in template bank with this YAML file.
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse().map_err(|e: roast_core::RoastError| e.to_string())
}

fn read_metrics(path: Option<&PathBuf>) -> Result<MetricBundle> {
    let raw = match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read metrics from {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read metrics from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("metrics must be a flat JSON object")
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    config::load_dotenv();
    let cli = Cli::parse();

    let bank = match &cli.bank {
        Some(path) => TemplateBank::load(path)
            .with_context(|| format!("failed to load template bank {}", path.display()))?,
        None => TemplateBank::builtin().context("built-in template bank is invalid")?,
    };
    let bank = Arc::new(bank);

    let narrator = if cli.external {
        let config = Config::from_env();
        config.log_summary();
        Narrator::from_config(bank, &config)
    } else {
        Narrator::new(bank)
    };

    let metrics = read_metrics(cli.metrics.as_ref())?;
    info!(metrics = metrics.len(), mode = %cli.mode, "generating narrative");

    let result = narrator
        .generate(&metrics, cli.mode, cli.external, &cli.label)
        .await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");

    Ok(())
}

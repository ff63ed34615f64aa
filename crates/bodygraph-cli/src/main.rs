mod sampled_ephemeris;

use anyhow::{Context, Result};
use bodygraph_chart::{Chart, ChartEngine};
use bodygraph_core::{normalize_degrees, BirthData, DegreeTable, EngineConfig, MANDALA_OFFSET};
use bodygraph_graph::Bodygraph;
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use sampled_ephemeris::SampledEphemeris;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bodygraph")]
#[command(about = "Bodygraph CLI - gate resolution and chart computation", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (json, pretty)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "BODYGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an ecliptic longitude to its gate and line
    Gate {
        /// Longitude in degrees; any real value is accepted
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Validate and print the reference tables
    Tables,

    /// Compute a chart from a sampled ephemeris file
    Chart {
        /// JSON file of time-ordered longitude samples
        #[arg(short, long)]
        ephemeris: PathBuf,

        /// Birth moment as RFC 3339, local offset included
        #[arg(short, long)]
        birth: String,

        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        lon: f64,
    },
}

#[derive(Serialize)]
struct GateResult {
    longitude: f64,
    shifted: f64,
    gate: u8,
    line: u8,
    activation: String,
    span_start: f64,
    span_end: f64,
}

#[derive(Serialize)]
struct ChannelRow {
    name: String,
    label: Option<String>,
    centers: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        EngineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    // No subscriber exists while the config loads
    info!(
        source = %config_source(cli.config.as_deref()),
        level = %config.logging.level,
        "configuration loaded"
    );

    match execute_command(&cli, config).await {
        Ok(output) => {
            print_output(&cli.output, &output)?;
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn execute_command(cli: &Cli, config: EngineConfig) -> Result<serde_json::Value> {
    match &cli.command {
        Commands::Gate { longitude } => execute_gate_command(*longitude),
        Commands::Tables => execute_tables_command(),
        Commands::Chart {
            ephemeris,
            birth,
            lat,
            lon,
        } => {
            let birth = parse_birth(birth, *lat, *lon)?;
            let chart = execute_chart_command(ephemeris, &birth, config).await?;
            match cli.output {
                OutputFormat::Json => Ok(serde_json::to_value(&chart)?),
                OutputFormat::Pretty => Ok(chart_summary(&chart)),
            }
        }
    }
}

fn execute_gate_command(longitude: f64) -> Result<serde_json::Value> {
    let table = DegreeTable::standard().context("Degree table failed validation")?;
    let resolved = table
        .resolve(longitude)
        .context("Failed to resolve longitude")?;
    let span = table
        .span(resolved.gate)
        .context("Resolved gate has no span")?;

    let result = GateResult {
        longitude,
        shifted: normalize_degrees(longitude + MANDALA_OFFSET),
        gate: resolved.gate,
        line: resolved.line,
        activation: resolved.to_string(),
        span_start: span.start,
        span_end: span.end,
    };
    Ok(serde_json::to_value(result)?)
}

fn execute_tables_command() -> Result<serde_json::Value> {
    let table = DegreeTable::standard().context("Degree table failed validation")?;
    let graph = Bodygraph::standard().context("Bodygraph failed validation")?;

    let channels: Vec<ChannelRow> = graph
        .channels()
        .iter()
        .map(|c| ChannelRow {
            name: c.name.clone(),
            label: c.label.clone(),
            centers: format!("{} - {}", c.centers[0], c.centers[1]),
        })
        .collect();

    Ok(serde_json::json!({
        "gates": table.spans(),
        "channels": channels,
    }))
}

async fn execute_chart_command(
    ephemeris: &Path,
    birth: &BirthData,
    config: EngineConfig,
) -> Result<Chart> {
    let ephemeris = SampledEphemeris::from_path(ephemeris)?;
    let engine = ChartEngine::new(Arc::new(ephemeris), config)
        .context("Failed to initialize chart engine")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling chart computation");
            on_interrupt.cancel();
        }
    });

    let chart = engine
        .compute(birth, &cancel)
        .await
        .context("Chart computation failed")?;
    Ok(chart)
}

fn config_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("{} + BODYGRAPH_* environment", path.display()),
        None => "defaults + BODYGRAPH_* environment".to_string(),
    }
}

/// Local components come from the given offset; the UTC instant is derived.
fn parse_birth(birth: &str, latitude: f64, longitude: f64) -> Result<BirthData> {
    let local: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(birth)
        .with_context(|| format!("Invalid RFC 3339 birth time: {}", birth))?;
    Ok(BirthData {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        latitude,
        longitude,
        utc: local.with_timezone(&Utc),
    })
}

fn chart_summary(chart: &Chart) -> serde_json::Value {
    let channels: Vec<String> = chart.channels().iter().map(|c| c.name.clone()).collect();
    let centers: Vec<String> = chart
        .defined_centers()
        .iter()
        .map(|c| c.to_string())
        .collect();

    serde_json::json!({
        "type": chart.chart_type().to_string(),
        "strategy": chart.strategy(),
        "authority": chart.authority().to_string(),
        "profile": format!("{} ({})", chart.profile(), chart.profile().label()),
        "definition": chart.definition_type().to_string(),
        "design_instant": chart.design_instant().to_rfc3339(),
        "personality_sun": chart.personality().sun().to_string(),
        "design_sun": chart.design().sun().to_string(),
        "channels": channels.join(", "),
        "defined_centers": centers.join(", "),
        "schema_version": chart.schema_version(),
    })
}

fn print_output(format: &OutputFormat, value: &serde_json::Value) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Pretty => {
            print_pretty(value)?;
        }
    }
    Ok(())
}

fn print_pretty(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                let key_colored = key.cyan().bold();
                match val {
                    serde_json::Value::String(s) => {
                        println!("{}: {}", key_colored, s.green());
                    }
                    serde_json::Value::Number(n) => {
                        println!("{}: {}", key_colored, n.to_string().yellow());
                    }
                    serde_json::Value::Array(items) => {
                        println!("{}:", key_colored);
                        for item in items {
                            print_row(item);
                        }
                    }
                    _ => {
                        println!("{}: {}", key_colored, val);
                    }
                }
            }
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}

fn print_row(item: &serde_json::Value) {
    match item {
        serde_json::Value::Object(fields) => {
            let cells: Vec<String> = fields
                .iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(s) => format!("{}={}", k, s),
                    other => format!("{}={}", k, other),
                })
                .collect();
            println!("  {}", cells.join("  "));
        }
        other => println!("  {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_components_stay_local() {
        let birth = parse_birth("1985-02-23T14:30:00+01:00", 52.5, 13.4).unwrap();
        assert_eq!((birth.hour, birth.minute), (14, 30));
        assert_eq!(birth.utc.hour(), 13);
        assert!(parse_birth("23/02/1985", 0.0, 0.0).is_err());
    }

    #[test]
    fn config_source_names_the_file() {
        let source = config_source(Some(Path::new("/etc/bodygraph.toml")));
        assert!(source.starts_with("/etc/bodygraph.toml"));
        assert!(config_source(None).starts_with("defaults"));
    }

    #[test]
    fn gate_command_reports_seam_boundary() {
        let out = execute_gate_command(0.0).unwrap();
        assert_eq!(out["gate"], 25);
        assert_eq!(out["line"], 3);
        assert_eq!(out["activation"], "25.3");
    }

    #[test]
    fn tables_command_lists_everything() {
        let out = execute_tables_command().unwrap();
        assert_eq!(out["gates"].as_array().unwrap().len(), 64);
        assert_eq!(out["channels"].as_array().unwrap().len(), 36);
    }
}

//! Group report binary
//!
//! Reads a group snapshot (group, members, expenses) as JSON and prints the
//! settlement report as JSON.

use anyhow::Context;
use balance_settlement::{Config, GroupSnapshot, SettlementEngine};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, stdout carries the report)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: settle-report <snapshot.json>")?;

    // Load configuration
    let config = if let Ok(config_path) = std::env::var("SETTLEMENT_CONFIG") {
        info!("Loading config from: {}", config_path);
        Config::from_file(&config_path)?
    } else {
        info!("Loading config from environment variables");
        Config::from_env()?
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read snapshot {}", path))?;
    let snapshot: GroupSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path))?;

    info!(
        "Snapshot loaded: group {}, {} members, {} expenses",
        snapshot.group.id,
        snapshot.members.len(),
        snapshot.expenses.len()
    );

    let engine = SettlementEngine::new(config)?;
    info!(
        "{} v{} (epsilon {})",
        engine.config().service_name,
        engine.config().service_version,
        engine.config().settlement.epsilon
    );

    let report = engine.summarize(&snapshot.group, &snapshot.members, &snapshot.expenses)?;
    info!(
        "{} transfers settle {}{}",
        report.settlements.len(),
        report.currency_symbol,
        report.total_settled()
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
